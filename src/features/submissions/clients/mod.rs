mod form_endpoint_client;

pub use form_endpoint_client::{FormEndpoint, FormEndpointError, HttpFormEndpoint};
