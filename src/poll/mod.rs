pub(crate) mod pipeline;
pub(crate) mod poll_loop;
