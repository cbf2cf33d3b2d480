//! ROI estimation for influencer (KOL) marketing campaigns.
//!
//! Raw form input is checked by [`campaign::validate`], turned into results by
//! [`roi::calculator::compute`], and presented through [`output`] or the REST
//! API in [`server`].

pub mod campaign;
pub mod config;
pub mod output;
pub mod roi;
pub mod server;
