//! Перевод поля `to` (секунды от полуночи) во время суток и абсолютное время.

use baikal_types::{BaikalError, BaikalResult, MainHeader};
use chrono::{DateTime, NaiveDate, NaiveTime, SubsecRound, TimeZone, Utc};

const SECS_PER_HOUR: f64 = 3600.0;
const SECS_PER_MINUTE: f64 = 60.0;

/// Раскладывает секунды от полуночи на (часы, минуты, секунды с дробью).
///
/// Отрицательное или нечисловое значение считается ошибкой вызова.
pub fn decompose(seconds_since_midnight: f64) -> BaikalResult<(u32, u32, f64)> {
    let s = seconds_since_midnight;

    if !s.is_finite() || s < 0.0 {
        return Err(BaikalError::invalid_time(format!(
            "seconds since midnight must be finite and >= 0, got {s}"
        )));
    }

    let hours = s.div_euclid(SECS_PER_HOUR);
    let remainder = s.rem_euclid(SECS_PER_HOUR);
    let minutes = remainder.div_euclid(SECS_PER_MINUTE);
    let seconds = remainder.rem_euclid(SECS_PER_MINUTE);

    Ok((hours as u32, minutes as u32, seconds))
}

/// Время суток с точностью до микросекунды (дробь усекается).
pub fn to_wall_clock(seconds_since_midnight: f64) -> BaikalResult<NaiveTime> {
    let (h, m, s) = decompose(seconds_since_midnight)?;
    let whole = s.trunc();
    let micros = ((s - whole) * 1_000_000.0).trunc() as u32;

    NaiveTime::from_hms_micro_opt(h, m, whole as u32, micros).ok_or_else(|| {
        BaikalError::invalid_time(format!(
            "{seconds_since_midnight} s is outside a single day"
        ))
    })
}

/// Абсолютное время первого отсчёта файла (точность 1 мс).
///
/// Округление выполняется над полным временем, поэтому `to` вплотную к
/// полуночи переходит на следующие сутки.
pub fn file_start_time(header: &MainHeader) -> BaikalResult<DateTime<Utc>> {
    let date = header_date(header)?;
    let time = to_wall_clock(header.start_offset)?;

    Ok(Utc
        .from_utc_datetime(&date.and_time(time))
        .round_subsecs(3))
}

fn header_date(header: &MainHeader) -> BaikalResult<NaiveDate> {
    let month = u32::try_from(header.month).ok();
    let day = u32::try_from(header.day).ok();

    month
        .zip(day)
        .and_then(|(m, d)| NaiveDate::from_ymd_opt(i32::from(header.year), m, d))
        .ok_or_else(|| {
            BaikalError::invalid_time(format!(
                "invalid date {:04}-{:02}-{:02}",
                header.year, header.month, header.day
            ))
        })
}

/// Разбирает строку "ЧЧ:ММ:СС.ддд" в секунды от полуночи.
pub fn parse_clock_seconds(clock: &str) -> BaikalResult<f64> {
    let bad = || BaikalError::invalid_time(format!("expected HH:MM:SS.fff, got '{clock}'"));

    let mut parts = clock.trim().split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };

    let h: u32 = h.parse().map_err(|_| bad())?;
    let m: u32 = m.parse().map_err(|_| bad())?;
    let s: f64 = s.parse().map_err(|_| bad())?;

    Ok(f64::from(h) * SECS_PER_HOUR + f64::from(m) * SECS_PER_MINUTE + s)
}

/// Смещение вступления волны относительно начала файла, в секундах.
///
/// Время вступления `wave_clock` ("ЧЧ:ММ:СС.ffffff") относится к той же дате,
/// что и `start`. Вступление не позже начала файла считается ошибкой.
pub fn seconds_from_start(
    wave_clock: &str,
    start: DateTime<Utc>,
) -> BaikalResult<f64> {
    let time = NaiveTime::parse_from_str(wave_clock.trim(), "%H:%M:%S%.f").map_err(|e| {
        BaikalError::invalid_time(format!("bad wave time '{wave_clock}': {e}"))
    })?;

    let event = Utc.from_utc_datetime(&start.date_naive().and_time(time));

    if event <= start {
        return Err(BaikalError::TimeOrdering {
            event: event.to_rfc3339(),
            start: start.to_rfc3339(),
        });
    }

    let delta = event - start;

    Ok(delta.num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0)
}
