//! Simulated city, weather and forecast lookups.
//!
//! Each lookup completes through an [`Executor`], never on the caller's
//! stack, so they behave like slow remote calls when driven by a
//! [`TaskQueue`](crate::TaskQueue).
//!
use crate::{do_later, Executor, Operation};
use thiserror::Error;

pub const CURRENT_CITY: &str = "New York, NY";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("City required to get {0}")]
    CityRequired(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weather {
    pub temp: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forecast {
    pub five_day: Vec<i32>,
}

pub fn fetch_current_city<X>(executor: &X) -> Operation<String, FetchError>
where
    X: Executor + ?Sized,
{
    Operation::from_producer(|completion| {
        do_later(executor, move || completion.complete(Ok(CURRENT_CITY.to_string())))
    })
}

pub fn fetch_weather<X>(executor: &X, city: Option<&str>) -> Operation<Weather, FetchError>
where
    X: Executor + ?Sized,
{
    let known = city.is_some();
    Operation::from_producer(|completion| {
        do_later(executor, move || {
            if known {
                completion.complete(Ok(Weather { temp: 50 }))
            } else {
                completion.complete(Err(FetchError::CityRequired("weather")))
            }
        })
    })
}

pub fn fetch_forecast<X>(executor: &X, city: Option<&str>) -> Operation<Forecast, FetchError>
where
    X: Executor + ?Sized,
{
    let known = city.is_some();
    Operation::from_producer(|completion| {
        do_later(executor, move || {
            if known {
                completion.complete(Ok(Forecast {
                    five_day: vec![60, 70, 80, 45, 50],
                }))
            } else {
                completion.complete(Err(FetchError::CityRequired("forecast")))
            }
        })
    })
}
