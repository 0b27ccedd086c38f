//! Pages the shell can route to.

use std::fmt;

use serde::Serialize;

/// A page-level view. Rendering is owned by the page itself; the router
/// only decides which page handles a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    HomeFeed,
    NotificationsFeed,
    UserFeed,
    MessageGroups,
    MessageGroup,
    Signup,
    Signin,
    Confirmation,
    Recover,
}

impl Page {
    pub const ALL: [Page; 9] = [
        Page::HomeFeed,
        Page::NotificationsFeed,
        Page::UserFeed,
        Page::MessageGroups,
        Page::MessageGroup,
        Page::Signup,
        Page::Signin,
        Page::Confirmation,
        Page::Recover,
    ];

    /// Stable identifier, used in logs, metrics labels and JSON.
    pub fn name(self) -> &'static str {
        match self {
            Page::HomeFeed => "home_feed",
            Page::NotificationsFeed => "notifications_feed",
            Page::UserFeed => "user_feed",
            Page::MessageGroups => "message_groups",
            Page::MessageGroup => "message_group",
            Page::Signup => "signup",
            Page::Signin => "signin",
            Page::Confirmation => "confirmation",
            Page::Recover => "recover",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::HomeFeed => "Home",
            Page::NotificationsFeed => "Notifications",
            Page::UserFeed => "Profile",
            Page::MessageGroups => "Messages",
            Page::MessageGroup => "Conversation",
            Page::Signup => "Sign up",
            Page::Signin => "Sign in",
            Page::Confirmation => "Confirm your account",
            Page::Recover => "Recover your password",
        }
    }

    /// Pages that read the identity client (current session, sign-in,
    /// sign-up flows). They must not render before the auth bootstrap has
    /// settled. A public user feed renders without it.
    pub fn needs_auth_state(self) -> bool {
        !matches!(self, Page::UserFeed)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
