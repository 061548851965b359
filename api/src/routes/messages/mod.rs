pub mod message_request;
pub mod message_route;
