pub mod qna_client;
