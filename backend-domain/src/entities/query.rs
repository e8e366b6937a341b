// Read-side query parameter shapes

use serde::Deserialize;

use crate::services::ranking::{AttendeeSortField, EventSortField, SortDirection};

#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    pub owner: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventListQuery {
    pub owner: Option<String>,
    pub field: Option<EventSortField>,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendeeListQuery {
    pub owner: Option<String>,
    pub field: Option<AttendeeSortField>,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    pub owner: Option<String>,
}
