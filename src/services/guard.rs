//! Role-gated route table.
//!
//! [`authorize`] is a pure function of the path and the session state,
//! evaluated on every navigation.

use std::fmt;

use super::session::SessionState;
use crate::utils::route::{match_pattern, normalize_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTier {
    Public,
    Authenticated,
    Admin,
}

impl fmt::Display for RouteTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTier::Public => f.write_str("public"),
            RouteTier::Authenticated => f.write_str("authenticated"),
            RouteTier::Admin => f.write_str("admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: &'static str,
    pub tier: RouteTier,
    pub title: &'static str,
}

const fn route(pattern: &'static str, tier: RouteTier, title: &'static str) -> RouteEntry {
    RouteEntry {
        pattern,
        tier,
        title,
    }
}

pub const HOME: &str = "/";
pub const PROFILE: &str = "/profile";
pub const NOT_FOUND: &str = "/404";

pub static ROUTES: &[RouteEntry] = &[
    route("/", RouteTier::Public, "Beranda"),
    route("/campaigns/:id", RouteTier::Public, "Detail Campaign"),
    route("/about-us", RouteTier::Public, "Tentang Kami"),
    route("/vision-mission", RouteTier::Public, "Visi & Misi"),
    route("/contact-us", RouteTier::Public, "Hubungi Kami"),
    route("/search-results", RouteTier::Public, "Hasil Pencarian"),
    route("/donation-success", RouteTier::Public, "Donasi Berhasil"),
    route("/donation-pending", RouteTier::Public, "Donasi Tertunda"),
    route("/404", RouteTier::Public, "Halaman Tidak Ditemukan"),
    route("/profile", RouteTier::Authenticated, "Profil"),
    route("/donations", RouteTier::Authenticated, "Donasi Saya"),
    route("/history", RouteTier::Authenticated, "Riwayat Donasi"),
    route("/admin/dashboard", RouteTier::Admin, "Dashboard Admin"),
    route("/admin/campaigns/add", RouteTier::Admin, "Tambah Campaign"),
    route("/admin/campaigns/edit/:id", RouteTier::Admin, "Edit Campaign"),
];

/// Outcome of a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow {
        route: RouteEntry,
        params: Vec<(String, String)>,
    },
    Redirect(&'static str),
}

impl RouteDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RouteDecision::Allow { .. })
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            RouteDecision::Redirect(to) => Some(to),
            RouteDecision::Allow { .. } => None,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        match self {
            RouteDecision::Allow { params, .. } => params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            RouteDecision::Redirect(_) => None,
        }
    }
}

/// Find the table entry for `path`
pub fn resolve(path: &str) -> Option<(RouteEntry, Vec<(String, String)>)> {
    let path = normalize_path(path);
    ROUTES
        .iter()
        .find_map(|entry| match_pattern(entry.pattern, &path).map(|params| (*entry, params)))
}

/// Decide whether the session may open `path`
pub fn authorize(path: &str, session: &SessionState) -> RouteDecision {
    let Some((route, params)) = resolve(path) else {
        return RouteDecision::Redirect(NOT_FOUND);
    };

    match route.tier {
        RouteTier::Public => RouteDecision::Allow { route, params },
        RouteTier::Authenticated if !session.is_login => RouteDecision::Redirect(HOME),
        RouteTier::Authenticated => RouteDecision::Allow { route, params },
        RouteTier::Admin if !session.is_login => RouteDecision::Redirect(HOME),
        RouteTier::Admin if !session.is_admin() => RouteDecision::Redirect(PROFILE),
        RouteTier::Admin => RouteDecision::Allow { route, params },
    }
}
