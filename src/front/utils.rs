//! Display helpers shared by every front end.
//!
//! Status maps, age text and price text used to be written once per client;
//! they live here as plain functions so all clients print the same thing.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    consts,
    models::{
        bird::{BirdStatus, Gender, Price},
        incubation::IncubationStatus,
        sale::FollowUpStatus,
    },
};

pub fn status_label(status: BirdStatus) -> &'static str {
    match status {
        BirdStatus::Available => "在售",
        BirdStatus::Sold => "已售",
        BirdStatus::Returned => "已退回",
        BirdStatus::Breeding => "种鸟",
        BirdStatus::Paired => "已配对",
        BirdStatus::Incubating => "孵化中",
    }
}

pub fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "公",
        Gender::Female => "母",
        Gender::Unverified => "未鉴定",
    }
}

pub fn incubation_status_label(status: IncubationStatus) -> &'static str {
    match status {
        IncubationStatus::Incubating => "孵化中",
        IncubationStatus::Hatched => "已出壳",
        IncubationStatus::Failed => "孵化失败",
    }
}

pub fn follow_up_status_label(status: FollowUpStatus) -> &'static str {
    match status {
        FollowUpStatus::Pending => "待回访",
        FollowUpStatus::Contacted => "已联系",
        FollowUpStatus::Satisfied => "满意",
        FollowUpStatus::Issue => "有问题",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum AgeVariant {
    /// Calendar months between the two dates
    #[default]
    Coarse,
    /// Day difference split into 365 day years and 30 day months
    Exact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Locale {
    #[default]
    Zh,
    En,
}

/// Human readable bird age.
///
/// Under 30 days is "less than a month", under a year is shown in months,
/// otherwise years with the remaining months when there are any.
pub fn fmt_age(
    birth_date: Option<NaiveDate>,
    today: NaiveDate,
    variant: AgeVariant,
    locale: Locale,
) -> String {
    let Some(birth_date) = birth_date else {
        return match locale {
            Locale::Zh => "未知".into(),
            Locale::En => "unknown".into(),
        };
    };

    let num_days = today.signed_duration_since(birth_date).num_days();
    if num_days < consts::DAYS_PER_MONTH {
        return match locale {
            Locale::Zh => "不足1月".into(),
            Locale::En => "<1 month".into(),
        };
    }

    let (years, months) = match variant {
        AgeVariant::Coarse => {
            let total_months = calendar_months_between(birth_date, today).max(1);
            (total_months / 12, total_months % 12)
        }
        AgeVariant::Exact => {
            let years = num_days / consts::DAYS_PER_YEAR;
            let months = ((num_days % consts::DAYS_PER_YEAR) / consts::DAYS_PER_MONTH).min(11);
            (years, months)
        }
    };

    match locale {
        Locale::Zh => match (years, months) {
            (0, m) => format!("{m}月龄"),
            (y, 0) => format!("{y}岁"),
            (y, m) => format!("{y}岁{m}月"),
        },
        Locale::En => match (years, months) {
            (0, m) => format!("{m} {}", plural(m, "month")),
            (y, 0) => format!("{y} {}", plural(y, "year")),
            (y, m) => format!("{y} {} {m} {}", plural(y, "year"), plural(m, "month")),
        },
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        unit.to_string()
    } else {
        format!("{unit}s")
    }
}

/// Completed calendar months from `start` to `end`.
fn calendar_months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut months = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0)
}

/// "¥1,200.00" for a fixed price, "¥800.00 - ¥1,200.00" for a range.
pub fn fmt_price(price: &Price) -> String {
    match price {
        Price::Fixed { amount } => fmt_amount(*amount),
        Price::Range { min, max } if min == max => fmt_amount(*min),
        Price::Range { min, max } => format!("{} - {}", fmt_amount(*min), fmt_amount(*max)),
    }
}

pub fn fmt_amount(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2).abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };

    format!(
        "{sign}{}{}.{frac_part}",
        consts::CURRENCY_SYMBOL,
        group_thousands(int_part)
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    digits
        .chars()
        .enumerate()
        .fold(String::with_capacity(len + len / 3), |mut acc, (i, c)| {
            if i > 0 && (len - i) % 3 == 0 {
                acc.push(',');
            }
            acc.push(c);
            acc
        })
}

pub fn remaining_days_label(days: i64) -> String {
    if days <= 0 {
        return "已过期".into();
    }
    format!("剩余{days}天")
}
