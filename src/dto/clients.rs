use crate::domain::client::{Client, Reminder, UpcomingEvent};
use crate::pagination::Paginated;

/// Query parameters accepted by the clients page service.
#[derive(Debug, Default)]
pub struct ClientsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Optional VIP tier filter from the toolbar select.
    pub vip_status: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
}

/// Data required to render the clients screen: the filtered client table,
/// the reminders tab and the upcoming-events strip.
pub struct ClientsPageData {
    pub clients: Paginated<Client>,
    /// Total number of clients matching the filter.
    pub total: usize,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
    /// VIP filter echoed back to the toolbar select.
    pub vip_filter: Option<String>,
    /// Every reminder joined with its client, soonest due first.
    pub reminders: Vec<(Reminder, Client)>,
    /// Birthdays and anniversaries inside the lookahead window.
    pub upcoming_events: Vec<UpcomingEvent>,
}
