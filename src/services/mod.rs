//! Page controllers: the local UI state of one page for one render cycle,
//! plus the remote calls that page makes.

pub mod composer_service;
pub mod feed_service;
pub mod post_detail_service;
pub mod profile_service;
