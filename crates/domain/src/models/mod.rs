//! Domain models for Masjid Screens.

pub mod content_item;
pub mod content_schedule;
pub mod masjid;
pub mod prayer_time;
pub mod screen;

pub use content_item::{
    ContentItem, ContentType, CreateContentItemRequest, UpdateContentItemRequest,
};
pub use content_schedule::{
    ContentSchedule, ContentScheduleItem, CreateScheduleRequest, DuplicateScheduleRequest,
    ScheduleWithItems, UpdateScheduleRequest,
};
pub use masjid::{Masjid, MasjidInfo};
pub use prayer_time::PrayerTimeDay;
pub use screen::{Orientation, Screen, ScreenStatus};
