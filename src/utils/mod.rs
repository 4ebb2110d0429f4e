pub mod async_task;
pub mod net;
