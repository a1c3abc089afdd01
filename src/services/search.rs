//! Navbar search over already-fetched data.
//!
//! Three result groups: campaigns whose title or description contains the
//! query, static pages, and keyword shortcuts. Matching is a case-insensitive
//! substring test; there is no ranking.

use serde::Serialize;

use super::session::SessionState;
use crate::models::Campaign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub path: &'static str,
}

pub static PAGES: &[PageEntry] = &[
    PageEntry {
        id: "home",
        title: "Home",
        content: "Home page of AmalSAS.id",
        path: "/",
    },
    PageEntry {
        id: "vision-mission",
        title: "Vision & Mission",
        content: "Our vision is to create a better world...",
        path: "/vision-mission",
    },
    PageEntry {
        id: "about-us",
        title: "About Us",
        content: "AmalSAS.id is a non-profit organization...",
        path: "/about-us",
    },
    PageEntry {
        id: "history",
        title: "History",
        content: "Donation history and records",
        path: "/history",
    },
    PageEntry {
        id: "profile",
        title: "Profile",
        content: "User profile and account settings",
        path: "/profile",
    },
    PageEntry {
        id: "dashboard",
        title: "Dashboard",
        content: "Admin dashboard for managing campaigns",
        path: "/admin/dashboard",
    },
    PageEntry {
        id: "add-campaign",
        title: "Add Campaign",
        content: "Create new donation campaign",
        path: "/admin/campaigns/add",
    },
];

/// Auth actions a keyword can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthAction {
    SignIn,
    SignUp,
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "target")]
pub enum KeywordTarget {
    Action(AuthAction),
    Navigation(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordEntry {
    pub id: &'static str,
    #[serde(skip)]
    pub fragments: &'static [&'static str],
    pub title: &'static str,
    pub content: &'static str,
    pub target: KeywordTarget,
    pub admin_only: bool,
}

pub static KEYWORDS: &[KeywordEntry] = &[
    KeywordEntry {
        id: "signin",
        fragments: &["masuk", "login", "signin"],
        title: "Sign In / Masuk",
        content: "Login to your account",
        target: KeywordTarget::Action(AuthAction::SignIn),
        admin_only: false,
    },
    KeywordEntry {
        id: "signup",
        fragments: &["daftar", "register", "signup"],
        title: "Sign Up / Daftar",
        content: "Create new account",
        target: KeywordTarget::Action(AuthAction::SignUp),
        admin_only: false,
    },
    KeywordEntry {
        id: "logout",
        fragments: &["logout", "keluar"],
        title: "Logout",
        content: "Sign out from your account",
        target: KeywordTarget::Action(AuthAction::Logout),
        admin_only: false,
    },
    KeywordEntry {
        id: "home",
        fragments: &["home", "beranda", "utama"],
        title: "Home / Beranda",
        content: "Kembali ke halaman utama",
        target: KeywordTarget::Navigation("/"),
        admin_only: false,
    },
    KeywordEntry {
        id: "profile",
        fragments: &["profil", "profile", "akun"],
        title: "Profile / Profil",
        content: "Kelola informasi akun Anda",
        target: KeywordTarget::Navigation("/profile"),
        admin_only: false,
    },
    KeywordEntry {
        id: "history",
        fragments: &["history", "riwayat", "donasi"],
        title: "History / Riwayat",
        content: "Lihat riwayat donasi Anda",
        target: KeywordTarget::Navigation("/history"),
        admin_only: false,
    },
    KeywordEntry {
        id: "vision-mission",
        fragments: &["visi", "misi", "vision", "mission"],
        title: "Visi & Misi",
        content: "Pelajari visi dan misi organisasi kami",
        target: KeywordTarget::Navigation("/vision-mission"),
        admin_only: false,
    },
    KeywordEntry {
        id: "about-us",
        fragments: &["tentang", "about", "kami"],
        title: "Tentang Kami / About Us",
        content: "Ketahui lebih lanjut tentang AmalSAS.id",
        target: KeywordTarget::Navigation("/about-us"),
        admin_only: false,
    },
    KeywordEntry {
        id: "contact-us",
        fragments: &["kontak", "contact", "hubungi"],
        title: "Kontak / Contact Us",
        content: "Hubungi kami untuk informasi lebih lanjut",
        target: KeywordTarget::Navigation("/contact-us"),
        admin_only: false,
    },
    KeywordEntry {
        id: "dashboard",
        fragments: &["admin", "dashboard", "panel"],
        title: "Admin Dashboard",
        content: "Panel administrasi untuk mengelola kampanye",
        target: KeywordTarget::Navigation("/admin/dashboard"),
        admin_only: true,
    },
    KeywordEntry {
        id: "add-campaign",
        fragments: &["tambah", "add", "buat", "kampanye"],
        title: "Tambah Kampanye / Add Campaign",
        content: "Buat kampanye donasi baru",
        target: KeywordTarget::Navigation("/admin/campaigns/add"),
        admin_only: true,
    },
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub campaigns: Vec<Campaign>,
    pub pages: Vec<PageEntry>,
    pub keywords: Vec<KeywordEntry>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty() && self.pages.is_empty() && self.keywords.is_empty()
    }
}

/// Run a search. A blank query is not a search and yields `None`.
pub fn search(query: &str, campaigns: &[Campaign], session: &SessionState) -> Option<SearchResults> {
    if query.trim().is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    let is_admin = session.is_admin();

    let campaigns = campaigns
        .iter()
        .filter(|c| {
            c.title.to_lowercase().contains(&needle) || c.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    let pages = PAGES
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle)
                || p.content.to_lowercase().contains(&needle)
                || p.path.to_lowercase().contains(&needle)
        })
        .copied()
        .collect();

    // keywords match when the query contains one of their fragments
    let keywords = KEYWORDS
        .iter()
        .filter(|k| k.fragments.iter().any(|f| needle.contains(f)))
        .filter(|k| !k.admin_only || is_admin)
        .copied()
        .collect();

    Some(SearchResults {
        query: query.to_string(),
        campaigns,
        pages,
        keywords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn campaigns() -> Vec<Campaign> {
        vec![
            Campaign {
                id: 1,
                title: "Jum'at Berkah".into(),
                description: "Membantu yang membutuhkan".into(),
                ..Default::default()
            },
            Campaign {
                id: 2,
                title: "Wakaf Qurban".into(),
                description: "Distribusi hewan qurban".into(),
                ..Default::default()
            },
        ]
    }

    fn admin() -> SessionState {
        SessionState {
            is_login: true,
            user: Some(User {
                is_admin: true,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_blank_query_is_not_a_search() {
        assert!(search("   ", &campaigns(), &SessionState::default()).is_none());
    }

    #[test]
    fn test_campaign_match_is_case_insensitive() {
        let results = search("QURBAN", &campaigns(), &SessionState::default()).unwrap();
        assert_eq!(results.campaigns.len(), 1);
        assert_eq!(results.campaigns[0].id, 2);
    }

    #[test]
    fn test_pages_match_title_content_or_path() {
        let results = search("vision-mission", &[], &SessionState::default()).unwrap();
        assert_eq!(results.pages.len(), 1);
        assert_eq!(results.pages[0].id, "vision-mission");
    }

    #[test]
    fn test_admin_keywords_hidden_from_visitors() {
        let visitor = search("admin dashboard", &[], &SessionState::default()).unwrap();
        assert!(visitor.keywords.iter().all(|k| k.id != "dashboard"));

        let admin = search("admin dashboard", &[], &admin()).unwrap();
        assert!(admin.keywords.iter().any(|k| k.id == "dashboard"));
    }

    #[test]
    fn test_keyword_actions() {
        let results = search("mau login", &[], &SessionState::default()).unwrap();
        assert_eq!(results.keywords.len(), 1);
        assert_eq!(results.keywords[0].target, KeywordTarget::Action(AuthAction::SignIn));

        let results = search("riwayat donasi", &[], &SessionState::default()).unwrap();
        assert_eq!(results.keywords[0].target, KeywordTarget::Navigation("/history"));
    }
}
