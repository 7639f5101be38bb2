//! Output labels for the per-event property block.

/// Event properties whose output label can be customized with
/// `org-property.<name>` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrgProperty {
    Status,
    Creator,
    HangoutLink,
    HtmlLink,
    CreationTime,
    Attendees,
}

impl OrgProperty {
    pub const ALL: [OrgProperty; 6] = [
        OrgProperty::Status,
        OrgProperty::Creator,
        OrgProperty::HangoutLink,
        OrgProperty::HtmlLink,
        OrgProperty::CreationTime,
        OrgProperty::Attendees,
    ];

    /// Name used in configuration keys (already lower-cased).
    pub fn config_name(self) -> &'static str {
        match self {
            OrgProperty::Status => "status",
            OrgProperty::Creator => "creator",
            OrgProperty::HangoutLink => "hangoutlink",
            OrgProperty::HtmlLink => "htmllink",
            OrgProperty::CreationTime => "creationtime",
            OrgProperty::Attendees => "attendees",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            OrgProperty::Status => "status",
            OrgProperty::Creator => "creator",
            OrgProperty::HangoutLink => "hangout-link",
            OrgProperty::HtmlLink => "html-link",
            OrgProperty::CreationTime => "created-at",
            OrgProperty::Attendees => "attendees",
        }
    }

    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.config_name() == name)
    }
}

/// Label written for each `OrgProperty` in the `:PROPERTIES:` drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLabels {
    status: String,
    creator: String,
    hangout_link: String,
    html_link: String,
    creation_time: String,
    attendees: String,
}

impl Default for PropertyLabels {
    fn default() -> Self {
        PropertyLabels {
            status: OrgProperty::Status.default_label().to_string(),
            creator: OrgProperty::Creator.default_label().to_string(),
            hangout_link: OrgProperty::HangoutLink.default_label().to_string(),
            html_link: OrgProperty::HtmlLink.default_label().to_string(),
            creation_time: OrgProperty::CreationTime.default_label().to_string(),
            attendees: OrgProperty::Attendees.default_label().to_string(),
        }
    }
}

impl PropertyLabels {
    pub fn get(&self, property: OrgProperty) -> &str {
        match property {
            OrgProperty::Status => &self.status,
            OrgProperty::Creator => &self.creator,
            OrgProperty::HangoutLink => &self.hangout_link,
            OrgProperty::HtmlLink => &self.html_link,
            OrgProperty::CreationTime => &self.creation_time,
            OrgProperty::Attendees => &self.attendees,
        }
    }

    pub fn set(&mut self, property: OrgProperty, label: impl Into<String>) {
        let slot = match property {
            OrgProperty::Status => &mut self.status,
            OrgProperty::Creator => &mut self.creator,
            OrgProperty::HangoutLink => &mut self.hangout_link,
            OrgProperty::HtmlLink => &mut self.html_link,
            OrgProperty::CreationTime => &mut self.creation_time,
            OrgProperty::Attendees => &mut self.attendees,
        };
        *slot = label.into();
    }
}
