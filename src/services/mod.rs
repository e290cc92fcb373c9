pub mod answer_store;
pub mod catalog_service;
pub mod code_runner_service;
pub mod quiz_session;
pub mod result_store;
pub mod scoring_service;
pub mod session_service;
pub mod timer_service;
