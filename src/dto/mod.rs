pub mod quiz_dto;
pub mod run_code_dto;
pub mod session_dto;
