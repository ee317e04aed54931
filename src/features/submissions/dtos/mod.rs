mod submission_dto;

pub use submission_dto::{
    EncodedImage, SubmissionPayload, SubmissionResponseDto, SubmissionStateDto, SubmitReportDto,
};
