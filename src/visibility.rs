//! # Visibility cache
//!
//! Per-day rising / transit / setting model of Jupiter for one observer.
//!
//! ## Overview
//!
//! A [`DayPositionCache`] is built once, before a forecast samples anything. For every UTC day
//! from the day before the run starts to two days after it ends, it stores a
//! [`JupiterDayPosition`]: Jupiter's apparent RA/Dec at 0h UT and the approximate rising,
//! transit and setting times of that day, in seconds after the day's midnight.
//!
//! The cache then answers two questions for any instant:
//!
//! - is Jupiter above the horizon? ([`JupiterDayPosition::skip`])
//! - which transit should the "hours from transit" statistic refer to?
//!   ([`DayPositionCache::correct_transit`])
//!
//! ## Day boundaries
//!
//! Rise and set times live in `[0, 86400)`. When `set < rising` the visibility window crosses
//! midnight: the body rose on the previous evening, or will set on the next morning. The
//! transit that belongs to a sample can then sit on the neighbouring day, which is why the
//! cache always holds one day of margin before the run and two after it.
//!
//! [`DayPositionCache::correct_transit`] expresses that neighbouring transit in the frame of the
//! sample's own day (negative for the previous day, beyond 86400 for the next one), so the
//! hour angle `(t − transit) / 3600` stays continuous across midnight.
//!
//! Transits come back every sidereal day, about four minutes short of a UTC day. Once a year a
//! UTC day holds two transits for a given site, while the cache stores one per day; the hidden
//! transit is restored one sidereal day after the previous cached one.
//!
//! ## Errors
//!
//! A day that is not in the cache is never treated as "not visible": lookups fail with
//! [`JovianError::MissingDayPosition`].

use std::collections::BTreeMap;

use hifitime::Epoch;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::constants::{
    Hours, Radian, SecondsOfDay, SECONDS_PER_DAY, SECONDS_PER_HOUR, SIDEREAL_DAY, STD_H0_STELLAR,
};
use crate::ephemeris::{Ephemeris, RiseTransitSet};
use crate::jovian_errors::JovianError;
use crate::observers::ObserverCoord;
use crate::time::{serialize_epoch, DayKey};

/// Jupiter's sky track for one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JupiterDayPosition {
    /// UTC midnight opening the day
    #[serde(serialize_with = "serialize_epoch")]
    pub day_start: Epoch,
    pub rising: SecondsOfDay,
    pub transit: SecondsOfDay,
    pub set: SecondsOfDay,
    /// Apparent right ascension at 0h UT (radians)
    pub right_ascension: Radian,
    /// Apparent declination at 0h UT (radians)
    pub declination: Radian,
}

impl JupiterDayPosition {
    pub fn new(day_start: Epoch, times: RiseTransitSet, right_ascension: Radian, declination: Radian) -> Self {
        JupiterDayPosition {
            day_start,
            rising: times.rising,
            transit: times.transit,
            set: times.set,
            right_ascension,
            declination,
        }
    }

    /// `true` when Jupiter is below the horizon `seconds` after the day's midnight.
    ///
    /// With `rising < set` the body is up strictly between the two; with `rising > set` the
    /// window wraps around midnight and the body is up after rising or before setting.
    /// Equal times never count as visible.
    pub fn skip(&self, seconds: SecondsOfDay) -> bool {
        let visible = (self.rising < self.set && self.rising < seconds && seconds < self.set)
            || (self.rising > self.set && (seconds > self.rising || seconds < self.set));
        !visible
    }

    /// `true` when the visibility window crosses midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.rising > self.set
    }
}

/// Day-keyed Jupiter positions for one observer.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPositionCache {
    observer: ObserverCoord,
    days: BTreeMap<DayKey, JupiterDayPosition>,
}

impl DayPositionCache {
    /// Compute the position of Jupiter for one day.
    ///
    /// Arguments
    /// ---------
    /// * `ephemeris`: source of RA/Dec, sidereal time and rise/set times.
    /// * `observer`: observing site.
    /// * `day`: the UTC calendar day.
    ///
    /// Return
    /// ------
    /// * The day's position, or [`JovianError::Circumpolar`] if Jupiter does not rise or set
    ///   for this site on that day.
    pub fn day_position<E: Ephemeris>(
        ephemeris: &E,
        observer: &ObserverCoord,
        day: DayKey,
    ) -> Result<JupiterDayPosition, JovianError> {
        let jd = day.jd();
        let (ra, dec) = ephemeris.apparent_ra_dec(jd);
        let theta0 = ephemeris.apparent_sidereal_time(jd);

        let times = ephemeris
            .approx_rise_transit_set(observer, STD_H0_STELLAR, theta0, ra, dec)
            .ok_or(JovianError::Circumpolar { day })?;

        debug!(
            day = %day,
            rising = times.rising,
            transit = times.transit,
            set = times.set,
            "cached Jupiter position"
        );

        Ok(JupiterDayPosition::new(day.start(), times, ra, dec))
    }

    /// Build the cache covering `[start, end]`.
    ///
    /// Days from the one before `start`'s UTC day through two days after `end`'s UTC day are
    /// computed, so every sample can look at its neighbours.
    ///
    /// Errors
    /// ------
    /// * [`JovianError::Circumpolar`] for the first day Jupiter does not rise/set.
    pub fn build<E: Ephemeris>(
        ephemeris: &E,
        observer: ObserverCoord,
        start: &Epoch,
        end: &Epoch,
    ) -> Result<Self, JovianError> {
        let first = DayKey::from_epoch(start).previous();
        let last = DayKey::from_epoch(end).next().next();

        let mut days = BTreeMap::new();
        let mut day = first;
        while day <= last {
            days.insert(day, Self::day_position(ephemeris, &observer, day)?);
            day = day.next();
        }

        Ok(DayPositionCache { observer, days })
    }

    /// Assemble a cache from precomputed day positions.
    pub fn from_positions<I>(observer: ObserverCoord, positions: I) -> Self
    where
        I: IntoIterator<Item = (DayKey, JupiterDayPosition)>,
    {
        DayPositionCache {
            observer,
            days: positions.into_iter().collect(),
        }
    }

    pub fn observer(&self) -> &ObserverCoord {
        &self.observer
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Cached days in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&DayKey, &JupiterDayPosition)> {
        self.days.iter()
    }

    pub fn get(&self, day: &DayKey) -> Option<&JupiterDayPosition> {
        self.days.get(day)
    }

    /// Cached position for `day`, failing if the day was never computed.
    pub fn entry(&self, day: &DayKey) -> Result<&JupiterDayPosition, JovianError> {
        self.days
            .get(day)
            .ok_or(JovianError::MissingDayPosition { day: *day })
    }

    /// Position of the UTC day containing `instant` and the seconds elapsed since its midnight.
    pub fn position_at(
        &self,
        instant: &Epoch,
    ) -> Result<(DayKey, &JupiterDayPosition, SecondsOfDay), JovianError> {
        let day = DayKey::from_epoch(instant);
        let position = self.entry(&day)?;
        let cur = day.seconds_of_day(instant);
        Ok((day, position, cur))
    }

    /// `true` when Jupiter is below the horizon at `instant`.
    pub fn skip(&self, instant: &Epoch) -> Result<bool, JovianError> {
        let (_, position, cur) = self.position_at(instant)?;
        Ok(position.skip(cur))
    }

    /// Transit time that `instant` should be measured against.
    ///
    /// The value is in seconds relative to the midnight opening `instant`'s UTC day:
    ///
    /// - the day's own transit when it falls inside the current visibility window,
    /// - a transit before midnight (from `previous.transit - 86400`) when the window opened
    ///   the previous evening,
    /// - a transit after midnight (from `86400 + next.transit`) when the window closes the next
    ///   morning.
    ///
    /// In the neighbour cases the candidates are the two cached transits plus any transit a
    /// calendar day holding two of them hides. The one inside the
    /// window that is nearest to `instant` wins. Both sides of midnight thus resolve to the same
    /// physical transit.
    ///
    /// Errors
    /// ------
    /// * [`JovianError::MissingDayPosition`] if the day or the needed neighbour is not cached.
    /// * [`JovianError::NotVisible`] if Jupiter is below the horizon at `instant`; callers are
    ///   expected to filter with [`skip`](Self::skip) first.
    /// * [`JovianError::UnreachableTransitCase`] if no case applies or no candidate transit lies in
    ///   the window (inconsistent cache).
    pub fn correct_transit(&self, instant: &Epoch) -> Result<SecondsOfDay, JovianError> {
        let (day, pos, cur) = self.position_at(instant)?;

        if pos.skip(cur) {
            return Err(JovianError::NotVisible { day, seconds: cur });
        }

        let same_day = pos.rising < pos.set
            || (pos.rising > pos.set
                && ((pos.transit > pos.rising && cur > pos.rising)
                    || (pos.transit < pos.set && cur < pos.set)));

        let nearest = if same_day {
            Some(pos.transit)
        } else if pos.transit > pos.rising {
            // window opened the previous evening
            let previous = self.entry(&day.previous())?;
            let window = (pos.rising - SECONDS_PER_DAY, pos.set);
            nearest_in_window(
                transit_events(previous.transit - SECONDS_PER_DAY, pos.transit),
                window,
                cur,
            )
        } else if pos.transit < pos.set {
            // window closes the next morning
            let next = self.entry(&day.next())?;
            let window = (pos.rising, pos.set + SECONDS_PER_DAY);
            nearest_in_window(
                transit_events(pos.transit, next.transit + SECONDS_PER_DAY),
                window,
                cur,
            )
        } else {
            None
        };

        nearest.ok_or(JovianError::UnreachableTransitCase { day, seconds: cur })
    }

    /// Signed hours between `instant` and its reference transit (positive after transit).
    pub fn hour_angle_from_transit(&self, instant: &Epoch) -> Result<Hours, JovianError> {
        let transit = self.correct_transit(instant)?;
        let cur = DayKey::from_epoch(instant).seconds_of_day(instant);
        Ok((cur - transit) / SECONDS_PER_HOUR)
    }
}

/// Transits between two cached ones, both ends included, in the same day frame.
///
/// Transits recur every sidereal day, so about once a year a UTC day holds two of them while
/// the cache keeps one per day. The gap between consecutive cached transits then spans about
/// two days: the missing transits are restored one sidereal day after `first`.
fn transit_events(first: SecondsOfDay, last: SecondsOfDay) -> Vec<SecondsOfDay> {
    let mut events = vec![first];
    let mut t = first + SIDEREAL_DAY;
    while last - t > SIDEREAL_DAY / 2.0 {
        events.push(t);
        t += SIDEREAL_DAY;
    }
    events.push(last);
    events
}

/// Candidate inside `[window.0, window.1]` closest to `cur`.
fn nearest_in_window(
    candidates: Vec<SecondsOfDay>,
    window: (SecondsOfDay, SecondsOfDay),
    cur: SecondsOfDay,
) -> Option<SecondsOfDay> {
    candidates
        .into_iter()
        .filter(|t| (window.0..=window.1).contains(t))
        .min_by(|a, b| (a - cur).abs().total_cmp(&(b - cur).abs()))
}

impl Serialize for DayPositionCache {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.days.serialize(serializer)
    }
}
