//! Page context resolution.
//!
//! The same client runs on every page template; [`Capabilities`] says which
//! parts of it are live on the current one.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageContext {
    Login,
    Recycle,
    Donation,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub connect_button: bool,
    pub wallet_panel: bool,
    pub balance_display: bool,
    pub balance_button: bool,
    pub scanner: bool,
    pub manual_entry: bool,
    pub donation: bool,
    pub refresh_balance_on_load: bool,
    pub resume_from_provider: bool,
}

impl PageContext {
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        match path {
            "/login" => PageContext::Login,
            "/recycle" => PageContext::Recycle,
            "/donation" => PageContext::Donation,
            _ => PageContext::Other,
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            PageContext::Login => Capabilities {
                connect_button: true,
                wallet_panel: true,
                ..Capabilities::default()
            },
            PageContext::Recycle => Capabilities {
                wallet_panel: true,
                balance_display: true,
                balance_button: true,
                scanner: true,
                manual_entry: true,
                resume_from_provider: true,
                ..Capabilities::default()
            },
            PageContext::Donation => Capabilities {
                wallet_panel: true,
                balance_display: true,
                balance_button: true,
                donation: true,
                refresh_balance_on_load: true,
                resume_from_provider: true,
                ..Capabilities::default()
            },
            PageContext::Other => Capabilities::default(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PageContext::Login => "login",
            PageContext::Recycle => "recycle",
            PageContext::Donation => "donation",
            PageContext::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_resolve() {
        assert_eq!(PageContext::from_path("/login"), PageContext::Login);
        assert_eq!(PageContext::from_path("/recycle"), PageContext::Recycle);
        assert_eq!(PageContext::from_path("/donation"), PageContext::Donation);
    }

    #[test]
    fn trailing_slash_and_query_are_ignored() {
        assert_eq!(PageContext::from_path("/recycle/"), PageContext::Recycle);
        assert_eq!(PageContext::from_path("/donation?tab=ngos"), PageContext::Donation);
        assert_eq!(PageContext::from_path("/login#top"), PageContext::Login);
    }

    #[test]
    fn unknown_paths_are_other() {
        for path in ["", "/", "/recycle/extra", "/Recycle", "/about"] {
            assert_eq!(PageContext::from_path(path), PageContext::Other, "{path}");
        }
    }

    #[test]
    fn only_recycle_scans_and_only_donation_donates() {
        let recycle = PageContext::Recycle.capabilities();
        let donation = PageContext::Donation.capabilities();
        assert!(recycle.scanner && recycle.manual_entry && !recycle.donation);
        assert!(donation.donation && !donation.scanner);
        assert!(PageContext::Login.capabilities().connect_button);
        assert_eq!(PageContext::Other.capabilities(), Capabilities::default());
    }
}
