//! Entity definitions (database row mappings).

pub mod content_item;
pub mod content_schedule;
pub mod masjid;
pub mod prayer_time;
pub mod screen;

pub use content_item::ContentItemEntity;
pub use content_schedule::{ContentScheduleEntity, ScheduleItemEntity, ScheduledItemRow};
pub use masjid::MasjidEntity;
pub use prayer_time::PrayerTimeEntity;
pub use screen::ScreenEntity;
