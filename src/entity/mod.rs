pub mod artist_calendar;
pub mod artists;
pub mod helpers;
pub mod shows;
pub mod venues;
