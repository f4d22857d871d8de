//! Screen domain model and pairing lifecycle types.
//!
//! A screen is born unpaired: a device-initiated request creates the row with
//! a short-lived pairing code, an admin claims the code and binds the screen
//! to their masjid, and from then on the device authenticates every request
//! with the API key issued at claim time. ONLINE/OFFLINE is a read-time
//! judgment derived from heartbeat recency, never a stored transition.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Length of a pairing code.
pub const PAIRING_CODE_LENGTH: usize = 6;

/// Alphabet a pairing code is drawn from (36 symbols, human-enterable).
pub const PAIRING_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// How long a freshly issued pairing code stays valid.
pub const PAIRING_CODE_TTL_MINUTES: i64 = 15;

/// Poll interval suggested to unclaimed devices.
pub const PAIRING_POLL_INTERVAL_MS: u64 = 5000;

/// A screen with no heartbeat for this long is reported OFFLINE.
pub const OFFLINE_THRESHOLD_SECS: i64 = 300;

/// Stored lifecycle status of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "screen_status", rename_all = "UPPERCASE")]
pub enum ScreenStatus {
    Pairing,
    Online,
    Offline,
}

impl ScreenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenStatus::Pairing => "PAIRING",
            ScreenStatus::Online => "ONLINE",
            ScreenStatus::Offline => "OFFLINE",
        }
    }
}

impl std::str::FromStr for ScreenStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAIRING" => Ok(ScreenStatus::Pairing),
            "ONLINE" => Ok(ScreenStatus::Online),
            "OFFLINE" => Ok(ScreenStatus::Offline),
            other => Err(format!("Unknown screen status: {}", other)),
        }
    }
}

impl std::fmt::Display for ScreenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical orientation of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "screen_orientation", rename_all = "UPPERCASE")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "LANDSCAPE",
            Orientation::Portrait => "PORTRAIT",
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LANDSCAPE" => Ok(Orientation::Landscape),
            "PORTRAIT" => Ok(Orientation::Portrait),
            other => Err(format!("Unknown orientation: {}", other)),
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Landscape
    }
}

/// Screen domain model.
///
/// Invariant: `api_key` and `masjid_id` are non-null iff `is_active` is true
/// and `status` is not PAIRING. A live `pairing_code` always carries an
/// unexpired `pairing_code_expires_at`; claim moves the code to
/// `claimed_code` so the device can still fetch its API key by code exactly
/// once, then both are cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Screen {
    pub id: Uuid,
    pub masjid_id: Option<Uuid>,
    pub name: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairing_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairing_code_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub claimed_code: Option<String>,
    #[serde(skip_serializing)]
    pub claimed_code_expires_at: Option<DateTime<Utc>>,
    pub status: ScreenStatus,
    pub is_active: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<Uuid>,
    /// Opaque device-reported settings and metrics; interpreted by the
    /// renderer, passed through untouched here.
    pub content_config: serde_json::Value,
    /// Opaque per-screen content overrides, returned as-is by the resolver.
    pub content_overrides: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Screen {
    /// Derives the effective ONLINE/OFFLINE liveness of a paired screen at
    /// `now`, regardless of the stored status field.
    ///
    /// A screen is OFFLINE when it has never been seen or its last heartbeat
    /// is older than [`OFFLINE_THRESHOLD_SECS`]. Recomputed on every read,
    /// never cached.
    pub fn derive_liveness(&self, now: DateTime<Utc>) -> ScreenStatus {
        derive_liveness(self.last_seen_at, now)
    }

    /// Whether the screen currently holds an unexpired pairing code.
    pub fn has_live_pairing_code(&self, now: DateTime<Utc>) -> bool {
        self.pairing_code.is_some()
            && self.pairing_code_expires_at.is_some_and(|exp| exp > now)
    }

    /// Whether the screen has completed the claim transition.
    pub fn is_claimed(&self) -> bool {
        self.is_active && self.api_key.is_some() && self.masjid_id.is_some()
    }
}

/// Liveness judgment from heartbeat recency.
pub fn derive_liveness(last_seen_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ScreenStatus {
    match last_seen_at {
        Some(seen) if now - seen <= Duration::seconds(OFFLINE_THRESHOLD_SECS) => {
            ScreenStatus::Online
        }
        _ => ScreenStatus::Offline,
    }
}

/// Generates a pairing code: 6 characters drawn uniformly from `[0-9A-Z]`.
///
/// Pure function of the thread RNG; uniqueness among live codes is enforced
/// by the registry at insert time.
pub fn generate_pairing_code() -> String {
    let mut rng = rand::thread_rng();
    (0..PAIRING_CODE_LENGTH)
        .map(|_| PAIRING_CODE_ALPHABET[rng.gen_range(0..PAIRING_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Expiry timestamp for a code issued now.
pub fn pairing_code_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(PAIRING_CODE_TTL_MINUTES)
}

/// Request for a new pairing code from an unclaimed device.
///
/// POST /api/v1/screens/unpaired - the unauthenticated bootstrap entry point.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RequestPairingRequest {
    #[validate(length(max = 50, message = "device_type must be at most 50 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
}

/// Response carrying a freshly issued pairing code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestPairingResponse {
    pub pairing_code: String,
    pub expires_at: DateTime<Utc>,
    pub check_interval_ms: u64,
}

/// Request body for pairing-status polls and device-side completion.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct PairingCodeRequest {
    #[validate(length(equal = 6, message = "pairing_code must be exactly 6 characters"))]
    pub pairing_code: String,
}

/// Poll result for an unclaimed device.
///
/// Unknown or expired codes are a NotFound error, not a variant here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckPairingResponse {
    Pending {
        paired: bool,
        check_again_in_ms: u64,
    },
    Claimed {
        paired: bool,
        api_key: String,
        masjid_id: Uuid,
    },
}

impl CheckPairingResponse {
    pub fn pending() -> Self {
        CheckPairingResponse::Pending {
            paired: false,
            check_again_in_ms: PAIRING_POLL_INTERVAL_MS,
        }
    }

    pub fn claimed(api_key: String, masjid_id: Uuid) -> Self {
        CheckPairingResponse::Claimed {
            paired: true,
            api_key,
            masjid_id,
        }
    }
}

/// Response for the deprecated device-side completion path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompletePairingResponse {
    pub screen_id: Uuid,
    pub api_key: String,
}

/// Admin request to claim an unpaired screen by its code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ClaimScreenRequest {
    #[validate(length(equal = 6, message = "pairing_code must be exactly 6 characters"))]
    pub pairing_code: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Response for a successful admin claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClaimScreenResponse {
    pub success: bool,
    pub screen: ScreenSummary,
}

/// Device heartbeat payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HeartbeatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ScreenStatus>,
    /// Device-reported metrics, shallow-merged into content_config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<serde_json::Value>,
}

/// Heartbeat acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HeartbeatResponse {
    pub success: bool,
}

/// Admin request to update a screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateScreenRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Explicit schedule override; send null to fall back to the masjid
    /// default schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<Option<Uuid>>,
}

/// Admin-facing screen view with derived liveness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScreenSummary {
    pub id: Uuid,
    pub name: String,
    pub status: ScreenStatus,
    pub is_active: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<Uuid>,
}

impl ScreenSummary {
    /// Builds the admin view of a screen, reporting derived liveness for
    /// paired screens (the stored status is only authoritative for PAIRING).
    pub fn from_screen(screen: &Screen, now: DateTime<Utc>) -> Self {
        let status = if screen.status == ScreenStatus::Pairing {
            ScreenStatus::Pairing
        } else {
            screen.derive_liveness(now)
        };
        Self {
            id: screen.id,
            name: screen.name.clone(),
            status,
            is_active: screen.is_active,
            last_seen_at: screen.last_seen_at,
            orientation: screen.orientation,
            location: screen.location.clone(),
            schedule_id: screen.schedule_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_screen() -> Screen {
        Screen {
            id: Uuid::new_v4(),
            masjid_id: Some(Uuid::new_v4()),
            name: "Main Hall".to_string(),
            api_key: Some("msk_test".to_string()),
            pairing_code: None,
            pairing_code_expires_at: None,
            claimed_code: None,
            claimed_code_expires_at: None,
            status: ScreenStatus::Online,
            is_active: true,
            last_seen_at: Some(Utc::now()),
            orientation: Orientation::Landscape,
            device_type: Some("android-tv".to_string()),
            location: None,
            schedule_id: None,
            content_config: serde_json::json!({}),
            content_overrides: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_pairing_code_length() {
        let code = generate_pairing_code();
        assert_eq!(code.len(), PAIRING_CODE_LENGTH);
    }

    #[test]
    fn test_generate_pairing_code_alphabet() {
        for _ in 0..100 {
            let code = generate_pairing_code();
            assert!(
                code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
                "unexpected character in code {}",
                code
            );
        }
    }

    #[test]
    fn test_generate_pairing_code_varies() {
        let codes: std::collections::HashSet<_> =
            (0..50).map(|_| generate_pairing_code()).collect();
        // 36^6 combinations; 50 draws colliding entirely would mean a broken RNG
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_pairing_code_expiry_window() {
        let expiry = pairing_code_expiry();
        let now = Utc::now();
        assert!(expiry > now + Duration::minutes(PAIRING_CODE_TTL_MINUTES - 1));
        assert!(expiry <= now + Duration::minutes(PAIRING_CODE_TTL_MINUTES));
    }

    #[test]
    fn test_derive_liveness_never_seen() {
        assert_eq!(derive_liveness(None, Utc::now()), ScreenStatus::Offline);
    }

    #[test]
    fn test_derive_liveness_recent_heartbeat() {
        let now = Utc::now();
        let seen = now - Duration::seconds(10);
        assert_eq!(derive_liveness(Some(seen), now), ScreenStatus::Online);
    }

    #[test]
    fn test_derive_liveness_exactly_at_threshold() {
        let now = Utc::now();
        let seen = now - Duration::seconds(OFFLINE_THRESHOLD_SECS);
        // OFFLINE only when strictly older than the threshold
        assert_eq!(derive_liveness(Some(seen), now), ScreenStatus::Online);
    }

    #[test]
    fn test_derive_liveness_past_threshold() {
        let now = Utc::now();
        let seen = now - Duration::seconds(OFFLINE_THRESHOLD_SECS + 1);
        assert_eq!(derive_liveness(Some(seen), now), ScreenStatus::Offline);
    }

    #[test]
    fn test_derive_liveness_future_last_seen() {
        let now = Utc::now();
        let seen = now + Duration::seconds(30);
        assert_eq!(derive_liveness(Some(seen), now), ScreenStatus::Online);
    }

    #[test]
    fn test_has_live_pairing_code() {
        let mut screen = test_screen();
        let now = Utc::now();
        assert!(!screen.has_live_pairing_code(now));

        screen.pairing_code = Some("AB12CD".to_string());
        screen.pairing_code_expires_at = Some(now + Duration::minutes(5));
        assert!(screen.has_live_pairing_code(now));

        screen.pairing_code_expires_at = Some(now - Duration::seconds(1));
        assert!(!screen.has_live_pairing_code(now));
    }

    #[test]
    fn test_is_claimed() {
        let mut screen = test_screen();
        assert!(screen.is_claimed());

        screen.api_key = None;
        assert!(!screen.is_claimed());
    }

    #[test]
    fn test_screen_status_roundtrip() {
        for status in [
            ScreenStatus::Pairing,
            ScreenStatus::Online,
            ScreenStatus::Offline,
        ] {
            assert_eq!(status.as_str().parse::<ScreenStatus>().unwrap(), status);
        }
        assert!("BOGUS".parse::<ScreenStatus>().is_err());
    }

    #[test]
    fn test_orientation_roundtrip() {
        for o in [Orientation::Landscape, Orientation::Portrait] {
            assert_eq!(o.as_str().parse::<Orientation>().unwrap(), o);
        }
        assert!("sideways".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_check_pairing_response_pending_serialization() {
        let json = serde_json::to_value(CheckPairingResponse::pending()).unwrap();
        assert_eq!(json["paired"], false);
        assert_eq!(json["check_again_in_ms"], 5000);
    }

    #[test]
    fn test_check_pairing_response_claimed_serialization() {
        let masjid_id = Uuid::new_v4();
        let json = serde_json::to_value(CheckPairingResponse::claimed(
            "msk_abc".to_string(),
            masjid_id,
        ))
        .unwrap();
        assert_eq!(json["paired"], true);
        assert_eq!(json["api_key"], "msk_abc");
        assert_eq!(json["masjid_id"], masjid_id.to_string());
    }

    #[test]
    fn test_claim_request_validation() {
        let request = ClaimScreenRequest {
            pairing_code: "AB12CD".to_string(),
            name: "Entrance".to_string(),
            location: None,
        };
        assert!(request.validate().is_ok());

        let request = ClaimScreenRequest {
            pairing_code: "AB12".to_string(),
            name: "Entrance".to_string(),
            location: None,
        };
        assert!(request.validate().is_err());

        let request = ClaimScreenRequest {
            pairing_code: "AB12CD".to_string(),
            name: String::new(),
            location: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_screen_serialization_hides_api_key() {
        let screen = test_screen();
        let json = serde_json::to_value(&screen).unwrap();
        assert!(json.get("api_key").is_none());
        assert!(json.get("claimed_code").is_none());
    }

    #[test]
    fn test_screen_summary_reports_derived_status() {
        let mut screen = test_screen();
        let now = Utc::now();
        screen.status = ScreenStatus::Online;
        screen.last_seen_at = Some(now - Duration::minutes(30));

        let summary = ScreenSummary::from_screen(&screen, now);
        assert_eq!(summary.status, ScreenStatus::Offline);
    }

    #[test]
    fn test_screen_summary_keeps_pairing_status() {
        let mut screen = test_screen();
        screen.status = ScreenStatus::Pairing;
        screen.last_seen_at = None;

        let summary = ScreenSummary::from_screen(&screen, Utc::now());
        assert_eq!(summary.status, ScreenStatus::Pairing);
    }
}
