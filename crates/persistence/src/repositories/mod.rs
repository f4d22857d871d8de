//! Repository implementations for database operations.

pub mod content_item;
pub mod content_schedule;
pub mod masjid;
pub mod prayer_time;
pub mod screen;

pub use content_item::ContentItemRepository;
pub use content_schedule::ContentScheduleRepository;
pub use masjid::MasjidRepository;
pub use prayer_time::PrayerTimeRepository;
pub use screen::ScreenRepository;
