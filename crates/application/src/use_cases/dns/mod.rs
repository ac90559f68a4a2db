mod forward_query;

pub use forward_query::{build_reply, ForwardQueryUseCase};
