//! Auth widget region
//!
//! Signed out, the region holds the sign-in affordance. Signed in, it holds
//! an avatar button with a dropdown menu of account actions. The dropdown
//! closes on any document click outside the menu container.

use super::{escape_html, ClickTarget};
use crate::identity::User;

/// Element id of the signed-in menu container
pub const USER_MENU_CONTAINER_ID: &str = "user-menu-container";

/// Label of the sign-in affordance
pub const SIGN_IN_LABEL: &str = "Sign In / Sign Up";

/// Action offered by the signed-in menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Open the identity provider's profile view
    ManageAccount,
    /// Link a Discord account
    LinkDiscord,
    /// End the session
    SignOut,
}

impl MenuItem {
    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::ManageAccount => "Manage Account",
            Self::LinkDiscord => "Link Discord Account",
            Self::SignOut => "Sign Out",
        }
    }

    /// Button element id.
    pub fn element_id(self) -> &'static str {
        match self {
            Self::ManageAccount => "profile-btn",
            Self::LinkDiscord => "link-discord-btn",
            Self::SignOut => "signout-btn",
        }
    }
}

/// Signed-in avatar menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMenu {
    /// Signed-in user
    pub user: User,
    /// Whether the dropdown is shown
    pub open: bool,
    /// Whether to offer Discord linking
    pub offer_discord_link: bool,
}

impl UserMenu {
    /// Creates a closed menu for `user`.
    pub fn new(user: User) -> Self {
        Self {
            user,
            open: false,
            offer_discord_link: false,
        }
    }

    /// Actions in display order.
    pub fn items(&self) -> Vec<MenuItem> {
        let mut items = vec![MenuItem::ManageAccount];
        if self.offer_discord_link {
            items.push(MenuItem::LinkDiscord);
        }
        items.push(MenuItem::SignOut);
        items
    }

    /// Avatar button click.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Document-level click; closes the dropdown when outside the container.
    ///
    /// # Returns
    ///
    /// `true` if the dropdown was closed by this click
    pub fn document_click(&mut self, target: &ClickTarget) -> bool {
        if self.open && target.is_outside(USER_MENU_CONTAINER_ID) {
            self.open = false;
            return true;
        }
        false
    }

    fn markup(&self) -> String {
        let avatar = match &self.user.image_url {
            Some(url) => format!(
                r#"<img src="{}" alt="{}">"#,
                escape_html(url),
                escape_html(self.user.display_label())
            ),
            None => escape_html(self.user.display_label()),
        };
        let buttons: String = self
            .items()
            .into_iter()
            .map(|item| format!(r#"<button id="{}">{}</button>"#, item.element_id(), item.label()))
            .collect();
        let display = if self.open { "block" } else { "none" };

        format!(
            concat!(
                r#"<div id="{container}">"#,
                r#"<button id="user-menu-button">{avatar}</button>"#,
                r#"<div id="user-menu-dropdown" style="display: {display};">{buttons}</div>"#,
                "</div>"
            ),
            container = USER_MENU_CONTAINER_ID,
            avatar = avatar,
            display = display,
            buttons = buttons,
        )
    }
}

/// Content of the auth region
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthWidget {
    /// Session not loaded yet
    #[default]
    Empty,
    /// Sign-in affordance
    SignIn,
    /// Signed-in menu
    Menu(UserMenu),
}

impl AuthWidget {
    /// The signed-in menu, if shown.
    pub fn menu(&self) -> Option<&UserMenu> {
        match self {
            Self::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    /// Mutable access to the signed-in menu, if shown.
    pub fn menu_mut(&mut self) -> Option<&mut UserMenu> {
        match self {
            Self::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    /// Renders the region.
    pub fn markup(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::SignIn => format!(
                r#"<button id="signin-btn" class="revision-btn">{}</button>"#,
                SIGN_IN_LABEL
            ),
            Self::Menu(menu) => menu.markup(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> UserMenu {
        UserMenu::new(User::new("u1").with_name("Ada").with_image("https://img.example.com/a.png"))
    }

    #[test]
    fn test_items_without_discord() {
        assert_eq!(menu().items(), vec![MenuItem::ManageAccount, MenuItem::SignOut]);
    }

    #[test]
    fn test_items_with_discord() {
        let mut menu = menu();
        menu.offer_discord_link = true;
        assert_eq!(
            menu.items(),
            vec![MenuItem::ManageAccount, MenuItem::LinkDiscord, MenuItem::SignOut]
        );
        assert!(AuthWidget::Menu(menu).markup().contains("Link Discord Account"));
    }

    #[test]
    fn test_outside_click_closes() {
        let mut menu = menu();
        menu.toggle();
        assert!(menu.open);

        let inside = ClickTarget::within(["user-menu-dropdown", USER_MENU_CONTAINER_ID]);
        assert!(!menu.document_click(&inside));
        assert!(menu.open);

        assert!(menu.document_click(&ClickTarget::within(["app"])));
        assert!(!menu.open);
    }

    #[test]
    fn test_outside_click_when_closed_is_noop() {
        let mut menu = menu();
        assert!(!menu.document_click(&ClickTarget::document()));
    }

    #[test]
    fn test_sign_in_markup() {
        assert!(AuthWidget::SignIn.markup().contains(SIGN_IN_LABEL));
        assert_eq!(AuthWidget::Empty.markup(), "");
    }

    #[test]
    fn test_menu_markup_reflects_open_state() {
        let mut menu = menu();
        assert!(menu.markup().contains("display: none;"));
        menu.toggle();
        let html = menu.markup();
        assert!(html.contains("display: block;"));
        assert!(html.contains(r#"alt="Ada""#));
    }
}
