/// Application name
pub const APP_NAME: &str = "BK Tutor";

/// Port the backend gateway listens on when the page is served from a
/// local network host.
pub const LOCAL_API_PORT: u16 = 4000;

/// API prefix used when the page is served behind the public reverse proxy.
pub const PUBLIC_API_PREFIX: &str = "/api";

/// Inclusive bounds of the availability hour range.
pub const MIN_HOUR: u8 = 0;
pub const MAX_HOUR: u8 = 24;

/// Sessions shown per browse page.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Quiet period before a filter change triggers a re-fetch (milliseconds).
pub const FILTER_DEBOUNCE_MS: u64 = 250;

/// Entries shown by the "recent" tab of booked / attended lists.
pub const RECENT_TAB_LIMIT: usize = 10;

/// Entries shown by the compact history views on the profile page.
pub const HISTORY_PREVIEW_LIMIT: usize = 2;

/// Replacement sessions offered when rescheduling.
pub const MAX_RESCHEDULE_OPTIONS: usize = 20;

/// Fallback pool size when no replacement shares the course code.
pub const RESCHEDULE_FALLBACK_POOL: usize = 30;

/// Capacity of the persisted "recent downloads" log.
pub const DOWNLOAD_LOG_CAPACITY: usize = 50;

/// Downloads shown in the profile sidebar panel.
pub const DOWNLOAD_PANEL_LIMIT: usize = 4;

/// Maximum words of the bio shown on the profile card.
pub const BIO_MAX_WORDS: usize = 40;

/// Progress assumed for attended sessions that do not report one.
pub const DEFAULT_ATTENDED_PROGRESS: f64 = 100.0;

/// Progress assumed for courses derived from attendance history.
pub const HISTORY_PROGRESS_PERCENT: f64 = 80.0;
