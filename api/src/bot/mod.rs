pub mod qna_bot;
