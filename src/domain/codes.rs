/// Attempt succeeded.
pub const HTTP_OK: u16 = 200;
/// Reserved for timed-out attempts. Attempt logic never assigns it: deadlines
/// surface as `REQUEST_ERROR` (HTTP) or `PARSE_ERROR` (WebSocket read).
pub const REQUEST_TIMEOUT: u16 = 506;
/// Transport failure while sending.
pub const REQUEST_ERROR: u16 = 509;
/// Reply could not be read, decoded, or correlated.
pub const PARSE_ERROR: u16 = 510;
