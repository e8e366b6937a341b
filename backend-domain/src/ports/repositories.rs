use async_trait::async_trait;

use crate::entities::{RawAttendeeRow, RawEventRow};
use crate::error::FetchError;
use crate::value_objects::OwnerId;

#[async_trait]
pub trait MetadataRepository: Send + Sync {
    async fn list_events(&self, owner: &OwnerId) -> Result<Vec<RawEventRow>, FetchError>;
    async fn ping(&self) -> Result<(), FetchError>;
}

#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    async fn list_attendees(&self, owner: &OwnerId) -> Result<Vec<RawAttendeeRow>, FetchError>;
}
