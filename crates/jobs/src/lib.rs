//! Asynchronous job plumbing: the key-value job status store, the dispatcher
//! that queues work for the external compute service, and the helpers test
//! code uses to wait for dispatched work to finish.

pub mod dispatch;
pub mod error;
pub mod status;
pub mod store;
pub mod wait;

pub use dispatch::{JobDispatcher, JobRequest, QueueDispatcher};
pub use error::JobError;
pub use status::{JobDescriptor, JobStatusRecord};
pub use store::{JobStore, MemoryJobStore, RedisJobStore};
pub use wait::{wait_for_job, wait_for_prep_information_job, POLL_INTERVAL};
