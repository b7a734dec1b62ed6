use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Days between laying and the expected hatch date.
pub const INCUBATION_PERIOD_DAYS: i64 = 21;

/// Minimum bird age (days) used when picking pairing candidates.
pub const PAIRING_MIN_AGE_DAYS: i64 = 120;
/// Minimum bird age (days) used by the breeding list view.
pub const BREEDING_LIST_MIN_AGE_DAYS: i64 = 150;
/// Minimum bird age (days) used when choosing the parents of a clutch.
pub const PARENT_MIN_AGE_DAYS: i64 = 365;

pub const DAYS_PER_MONTH: i64 = 30;
pub const DAYS_PER_YEAR: i64 = 365;

pub const MAX_SHARE_LINK_DAYS: u32 = 30;
pub const RING_NUMBER_MAX_LEN: usize = 32;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub const MAX_SALE_PRICE: Decimal = dec!(1000000.00);
pub const CURRENCY_SYMBOL: &str = "¥";

pub const PHOTO_MAX_SIZE_BYTES: usize = 6_000_000;
pub const VIDEO_MAX_SIZE_BYTES: usize = 50_000_000;
pub const ACCEPTED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpeg", "jpg", "heic", "webp"];
pub const ACCEPTED_VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "mov", "webm"];

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
pub const SHARE_PUBLIC_PATH: &str = "/public/birds";
