pub mod run_code_client;
