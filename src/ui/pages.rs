//! Static sections: home, about, shooting guide and contact

use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_editor, text_input, Column, Row};
use iced::{Alignment, Element, Length};
use std::fmt;
use tracing::info;

use super::section::Section;
use super::{picture, ImageCache};
use crate::error::ValidationError;
use crate::state::controller::AppState;
use crate::state::data::Category;
use crate::Message;

pub const CONTACT_EMAIL: &str = "mchtejo89@naver.com";
pub const CONTACT_INSTAGRAM: &str = "@mcthejo";

pub fn home<'a>(state: &'a AppState, cache: &ImageCache) -> Element<'a, Message> {
    let config = state.config();

    let hero = column![
        picture(cache, Some(config.hero_image.as_str()), 960.0, 420.0, "Hero photo"),
        text(&config.hero_title).size(44),
        text(&config.hero_subtitle).size(18),
        button("Book a portrait session")
            .padding([14, 32])
            .on_press(Message::Navigate(Section::Contact)),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    let mut covers = Row::new().spacing(16);
    for category in Category::ALL {
        let tile = column![
            picture(cache, state.cover_for(category), 180.0, 240.0, "Coming soon"),
            text(category.label()).size(16),
        ]
        .spacing(8)
        .align_x(Alignment::Center);
        covers = covers.push(
            button(tile)
                .style(button::text)
                .on_press(Message::Navigate(Section::Portfolio)),
        );
    }

    let archives = column![text("ARCHIVES").size(12), text("Everyday views").size(28), covers]
        .spacing(16)
        .align_x(Alignment::Center);

    scrollable(
        column![hero, archives]
            .spacing(64)
            .padding(32)
            .width(Length::Fill)
            .align_x(Alignment::Center),
    )
    .height(Length::Fill)
    .into()
}

pub fn about<'a>(state: &'a AppState, cache: &ImageCache) -> Element<'a, Message> {
    let about = state.about();

    let profile = column![
        picture(cache, Some(about.profile_image.as_str()), 400.0, 500.0, "Profile photo"),
        text("PHOTOGRAPHER").size(12),
        text(&about.name).size(22),
    ]
    .spacing(8);

    let mut keywords = Row::new().spacing(8);
    for keyword in &about.keywords {
        keywords = keywords.push(container(text(format!("#{}", keyword)).size(13)).padding([6, 14]).style(container::rounded_box));
    }

    let philosophy = column![
        text("PHILOSOPHY").size(12),
        text(&about.philosophy_title).size(34),
        text(&about.philosophy_description).size(16),
        text("STYLE KEYWORDS").size(11),
        keywords,
    ]
    .spacing(20)
    .width(Length::Fill);

    scrollable(row![profile, philosophy].spacing(64).padding(48).align_y(Alignment::Center))
        .height(Length::Fill)
        .into()
}

const SERVICES: [&str; 4] = ["Personal profile", "Couple snaps", "Everyday records", "Small events"];

const FEATURES: [&str; 3] = [
    "Natural movement over forced poses.",
    "We talk and walk, and shoot along the way.",
    "Your own charm, not heavy retouching.",
];

const PROCESS: [(&str, &str, &str); 4] = [
    ("01", "Inquiry", "Check date and place"),
    ("02", "Concept", "Outfit and mood guide"),
    ("03", "Shooting", "One to two hours on site"),
    ("04", "Delivery", "Edited photos by email"),
];

pub fn snap<'a>() -> Element<'a, Message> {
    let services = SERVICES.iter().fold(Row::new().spacing(16), |acc, service| {
        acc.push(container(text(*service).size(18)).padding(24).style(container::rounded_box))
    });

    let features = FEATURES
        .iter()
        .fold(Column::new().spacing(12), |acc, feature| acc.push(text(format!("• {}", feature)).size(16)));

    let process = PROCESS.iter().fold(Column::new().spacing(16), |acc, (step, title, detail)| {
        acc.push(
            row![
                text(*step).size(28),
                column![text(*title).size(16), text(*detail).size(12)].spacing(2),
            ]
            .spacing(16)
            .align_y(Alignment::Center),
        )
    });

    scrollable(
        column![
            text("GUIDE").size(12),
            text("Snap Shooting").size(40),
            text("SERVICE").size(12),
            services,
            row![
                column![text("FEATURE").size(12), features].spacing(16).width(Length::Fill),
                column![text("PROCESS").size(12), process].spacing(16).width(Length::Fill),
            ]
            .spacing(48),
        ]
        .spacing(28)
        .padding(48),
    )
    .height(Length::Fill)
    .into()
}

/// Kind of shoot asked about in the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceType {
    #[default]
    Profile,
    CoupleOrFriends,
    EventOrPerformance,
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Profile,
        ServiceType::CoupleOrFriends,
        ServiceType::EventOrPerformance,
        ServiceType::Other,
    ];
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceType::Profile => "Personal profile",
            ServiceType::CoupleOrFriends => "Couple / friends snap",
            ServiceType::EventOrPerformance => "Event or performance",
            ServiceType::Other => "Other commercial inquiry",
        })
    }
}

#[derive(Debug, Clone)]
pub enum InquiryMessage {
    NameChanged(String),
    ContactChanged(String),
    ServiceSelected(ServiceType),
    DetailsEdited(text_editor::Action),
    Submit,
}

/// Contact form. Nothing is sent anywhere; a valid submission is acknowledged.
pub struct InquiryForm {
    name: String,
    contact: String,
    service: ServiceType,
    details: text_editor::Content,
}

impl Default for InquiryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact: String::new(),
            service: ServiceType::default(),
            details: text_editor::Content::new(),
        }
    }
}

impl InquiryForm {
    /// Apply a form event; `Some` carries a message for the status line
    pub fn update(&mut self, message: InquiryMessage) -> Option<String> {
        match message {
            InquiryMessage::NameChanged(name) => self.name = name,
            InquiryMessage::ContactChanged(contact) => self.contact = contact,
            InquiryMessage::ServiceSelected(service) => self.service = service,
            InquiryMessage::DetailsEdited(action) => self.details.perform(action),
            InquiryMessage::Submit => {
                return Some(match self.submit() {
                    Ok(()) => "Your inquiry was received. We will get back to you soon.".to_string(),
                    Err(e) => e.to_string(),
                });
            }
        }
        None
    }

    fn submit(&mut self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.contact.trim().is_empty() {
            return Err(ValidationError::MissingContactDetails);
        }
        info!("✉️  Inquiry from '{}' about {}", self.name.trim(), self.service);
        *self = Self::default();
        Ok(())
    }

    pub fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, Message> {
        let intro = column![
            text("RESERVATION").size(12),
            text("Contact").size(40),
            text(format!(
                "If there is a moment you want to keep, let's talk.\n{} will capture your day.",
                state.about().name
            ))
            .size(16),
            text("EMAIL").size(11),
            text(CONTACT_EMAIL).size(20),
            text("INSTAGRAM").size(11),
            text(CONTACT_INSTAGRAM).size(20),
            text("DM inquiries welcome").size(12),
        ]
        .spacing(12)
        .width(Length::Fill);

        let form = column![
            text_input("Your name", &self.name).on_input(|value| inquiry(InquiryMessage::NameChanged(value))),
            text_input("010-0000-0000", &self.contact).on_input(|value| inquiry(InquiryMessage::ContactChanged(value))),
            pick_list(ServiceType::ALL, Some(self.service), |service| {
                inquiry(InquiryMessage::ServiceSelected(service))
            }),
            text_editor(&self.details)
                .on_action(|action| inquiry(InquiryMessage::DetailsEdited(action)))
                .height(Length::Fixed(160.0)),
            button("Send message")
                .width(Length::Fill)
                .padding(14)
                .on_press(inquiry(InquiryMessage::Submit)),
        ]
        .spacing(16)
        .width(Length::Fill);

        scrollable(
            row![intro, container(form).padding(24).style(container::rounded_box)]
                .spacing(64)
                .padding(48),
        )
        .height(Length::Fill)
        .into()
    }
}

fn inquiry(message: InquiryMessage) -> Message {
    Message::Inquiry(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_requires_name_and_contact() {
        let mut form = InquiryForm::default();
        form.update(InquiryMessage::NameChanged("Kim".to_string()));

        let notice = form.update(InquiryMessage::Submit).unwrap();
        assert_eq!(notice, "Please leave your name and a way to reach you");
        assert_eq!(form.name, "Kim");
    }

    #[test]
    fn test_inquiry_is_acknowledged_and_cleared() {
        let mut form = InquiryForm::default();
        form.update(InquiryMessage::NameChanged("Kim".to_string()));
        form.update(InquiryMessage::ContactChanged("010-1234-5678".to_string()));
        form.update(InquiryMessage::ServiceSelected(ServiceType::EventOrPerformance));

        let notice = form.update(InquiryMessage::Submit).unwrap();
        assert!(notice.starts_with("Your inquiry was received"));
        assert!(form.name.is_empty());
        assert_eq!(form.service, ServiceType::Profile);
    }

    #[test]
    fn test_field_edits_have_no_notice() {
        let mut form = InquiryForm::default();
        assert!(form.update(InquiryMessage::ContactChanged("x".to_string())).is_none());
    }
}
