use std::fmt;

/// Which part of the site is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Home,
    Portfolio,
    About,
    Snap,
    Contact,
    Admin,
}

impl Section {
    /// Sections listed in the navigation bar (admin has its own button)
    pub const NAV: [Section; 5] = [
        Section::Home,
        Section::Portfolio,
        Section::About,
        Section::Snap,
        Section::Contact,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Portfolio => "portfolio",
            Section::About => "about",
            Section::Snap => "snap",
            Section::Contact => "contact",
            Section::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Home => "HOME",
            Section::Portfolio => "PORTFOLIO",
            Section::About => "ABOUT",
            Section::Snap => "SNAP SHOOTING",
            Section::Contact => "CONTACT",
            Section::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
