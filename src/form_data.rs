//! Signup form data
//!
//! `FormData` is the fixed record of everything the signup steps collect.
//! Every field is optional so "not filled in yet" is a typed state, and there
//! is no slot for keys the form does not know about.
//!
//! `FormDataPatch` is a partial update. Each field is in one of three states:
//! left alone (`None`), set (`Some(Some(v))`) or cleared (`Some(None)`).
//! Merging a patch replaces exactly the fields it mentions.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{Result, WizardError};
use crate::types::UserType;

/// Names of the signup form fields, as they appear in the persisted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum FormField {
    UserType,
    FullName,
    Email,
    Password,
    ConfirmPassword,
    Username,
    Description,
    Phone,
    Country,
    District,
    Division,
    PostalCode,
    IdNumber,
    FrontImage,
    BackImage,
    ProfileImage,
}

impl FormField {
    /// Image uploads are held in memory only and never persisted
    #[inline]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::FrontImage | Self::BackImage | Self::ProfileImage)
    }

    /// Fields that must not be echoed back in clear text
    #[inline]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }

    /// Fields only collected from boarding owners
    #[inline]
    pub const fn is_owner_only(self) -> bool {
        !matches!(
            self,
            Self::UserType | Self::FullName | Self::Email | Self::Password | Self::ConfirmPassword
        )
    }

    /// Parse a field name, mapping failures into the crate error
    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| WizardError::UnknownField(name.to_string()))
    }
}

/// An uploaded file picked on one of the image fields.
///
/// Only lives for the current session: the persisted entry stores `null` for
/// every image field, so callers must not expect uploads to survive a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: u64,
}

impl FileHandle {
    pub fn new(file_name: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            size,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// (De)serializer for image fields: always written as `null`, read back as
/// `None` whatever the stored value was.
mod transient_file {
    use super::FileHandle;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        _file: &Option<FileHandle>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_none()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FileHandle>, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(None)
    }
}

/// Accumulated signup form data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    // Universal
    pub user_type: UserType,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,

    // Boarding owners only
    pub username: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub district: Option<String>,
    pub division: Option<String>,
    pub postal_code: Option<String>,
    pub id_number: Option<String>,
    #[serde(with = "transient_file")]
    pub front_image: Option<FileHandle>,
    #[serde(with = "transient_file")]
    pub back_image: Option<FileHandle>,
    #[serde(with = "transient_file")]
    pub profile_image: Option<FileHandle>,
}

impl FormData {
    /// Shallow merge: fields mentioned by `patch` are replaced, the rest kept.
    ///
    /// Never validates and never fails.
    pub fn merge(&self, patch: &FormDataPatch) -> FormData {
        let mut merged = self.clone();

        if let Some(user_type) = patch.user_type {
            merged.user_type = user_type;
        }
        overlay(&mut merged.full_name, &patch.full_name);
        overlay(&mut merged.email, &patch.email);
        overlay(&mut merged.password, &patch.password);
        overlay(&mut merged.confirm_password, &patch.confirm_password);
        overlay(&mut merged.username, &patch.username);
        overlay(&mut merged.description, &patch.description);
        overlay(&mut merged.phone, &patch.phone);
        overlay(&mut merged.country, &patch.country);
        overlay(&mut merged.district, &patch.district);
        overlay(&mut merged.division, &patch.division);
        overlay(&mut merged.postal_code, &patch.postal_code);
        overlay(&mut merged.id_number, &patch.id_number);
        overlay(&mut merged.front_image, &patch.front_image);
        overlay(&mut merged.back_image, &patch.back_image);
        overlay(&mut merged.profile_image, &patch.profile_image);

        merged
    }

    /// Text value of a field. Image fields report their file name and
    /// `userType` reports its wire name when a role is set.
    pub fn value(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::UserType => self.user_type.is_set().then(|| self.user_type.as_str()),
            FormField::FrontImage => self.front_image.as_ref().map(|f| f.file_name.as_str()),
            FormField::BackImage => self.back_image.as_ref().map(|f| f.file_name.as_str()),
            FormField::ProfileImage => self.profile_image.as_ref().map(|f| f.file_name.as_str()),
            text => self.text(text).and_then(|v| v.as_deref()),
        }
    }

    /// Returns true when the field holds a non-empty value
    pub fn is_filled(&self, field: FormField) -> bool {
        self.value(field).is_some_and(|v| !v.is_empty())
    }

    /// Copy with password fields masked, for display and logging
    pub fn redacted(&self) -> FormData {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "********".to_string());
        FormData {
            password: mask(&self.password),
            confirm_password: mask(&self.confirm_password),
            ..self.clone()
        }
    }

    fn text(&self, field: FormField) -> Option<&Option<String>> {
        match field {
            FormField::FullName => Some(&self.full_name),
            FormField::Email => Some(&self.email),
            FormField::Password => Some(&self.password),
            FormField::ConfirmPassword => Some(&self.confirm_password),
            FormField::Username => Some(&self.username),
            FormField::Description => Some(&self.description),
            FormField::Phone => Some(&self.phone),
            FormField::Country => Some(&self.country),
            FormField::District => Some(&self.district),
            FormField::Division => Some(&self.division),
            FormField::PostalCode => Some(&self.postal_code),
            FormField::IdNumber => Some(&self.id_number),
            FormField::UserType
            | FormField::FrontImage
            | FormField::BackImage
            | FormField::ProfileImage => None,
        }
    }
}

fn overlay<T: Clone>(target: &mut Option<T>, update: &Option<Option<T>>) {
    if let Some(value) = update {
        *target = value.clone();
    }
}

/// Marks a present JSON key as `Some(..)` so `null` means "clear" and an
/// absent key means "leave alone".
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A present `userType: null` clears the role back to unset.
fn role_or_unset<'de, D>(deserializer: D) -> std::result::Result<Option<UserType>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<UserType>::deserialize(deserializer).map(|role| Some(role.unwrap_or_default()))
}

/// Partial update applied by `FormData::merge`
///
/// Deserializing from JSON rejects unknown keys. Image fields cannot be set
/// from JSON; use [`FormDataPatch::with_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormDataPatch {
    #[serde(default, deserialize_with = "role_or_unset")]
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "present")]
    pub full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub confirm_password: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub district: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub division: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub postal_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub id_number: Option<Option<String>>,
    #[serde(skip)]
    pub front_image: Option<Option<FileHandle>>,
    #[serde(skip)]
    pub back_image: Option<Option<FileHandle>>,
    #[serde(skip)]
    pub profile_image: Option<Option<FileHandle>>,
}

impl FormDataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object such as `{"fullName": "A B", "phone": null}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns true if applying this patch would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_user_type(mut self, user_type: UserType) -> Self {
        self.user_type = Some(user_type);
        self
    }

    /// Set a text field.
    ///
    /// `userType` and image fields are not text; they are left untouched
    /// here. Use [`Self::with_user_type`], [`Self::with_file`] or
    /// [`Self::set_str`] for those.
    pub fn with_text(mut self, field: FormField, value: impl Into<String>) -> Self {
        if let Some(slot) = self.text_slot(field) {
            *slot = Some(Some(value.into()));
        }
        self
    }

    pub fn with_file(mut self, field: FormField, file: FileHandle) -> Self {
        if let Some(slot) = self.file_slot(field) {
            *slot = Some(Some(file));
        }
        self
    }

    /// Clear a field back to "not filled in". Clearing `userType` resets the
    /// role to unset.
    pub fn clearing(mut self, field: FormField) -> Self {
        if field == FormField::UserType {
            self.user_type = Some(UserType::Unset);
        } else if let Some(slot) = self.text_slot(field) {
            *slot = Some(None);
        } else if let Some(slot) = self.file_slot(field) {
            *slot = Some(None);
        }
        self
    }

    /// Set a field from textual input (command line, query string).
    ///
    /// # Errors
    ///
    /// - `InvalidValue` if `userType` is not a known role
    /// - `InvalidValue` for image fields, which need an actual upload
    pub fn set_str(&mut self, field: FormField, value: &str) -> Result<()> {
        if field == FormField::UserType {
            let role = value.parse::<UserType>().map_err(|_| {
                WizardError::invalid_value(
                    field.to_string(),
                    format!("'{}' is not one of boarding_finder, boarding_owner", value),
                )
            })?;
            self.user_type = Some(role);
            return Ok(());
        }

        match self.text_slot(field) {
            Some(slot) => {
                *slot = Some(Some(value.to_string()));
                Ok(())
            }
            None => Err(WizardError::invalid_value(
                field.to_string(),
                "image fields only accept uploaded files",
            )),
        }
    }

    /// Fields this patch touches, in form order
    pub fn touched_fields(&self) -> Vec<FormField> {
        use strum::IntoEnumIterator;

        FormField::iter()
            .filter(|field| match *field {
                FormField::UserType => self.user_type.is_some(),
                FormField::FrontImage => self.front_image.is_some(),
                FormField::BackImage => self.back_image.is_some(),
                FormField::ProfileImage => self.profile_image.is_some(),
                text => self.text_ref(text).is_some_and(Option::is_some),
            })
            .collect()
    }

    fn text_ref(&self, field: FormField) -> Option<&Option<Option<String>>> {
        match field {
            FormField::FullName => Some(&self.full_name),
            FormField::Email => Some(&self.email),
            FormField::Password => Some(&self.password),
            FormField::ConfirmPassword => Some(&self.confirm_password),
            FormField::Username => Some(&self.username),
            FormField::Description => Some(&self.description),
            FormField::Phone => Some(&self.phone),
            FormField::Country => Some(&self.country),
            FormField::District => Some(&self.district),
            FormField::Division => Some(&self.division),
            FormField::PostalCode => Some(&self.postal_code),
            FormField::IdNumber => Some(&self.id_number),
            _ => None,
        }
    }

    fn text_slot(&mut self, field: FormField) -> Option<&mut Option<Option<String>>> {
        match field {
            FormField::FullName => Some(&mut self.full_name),
            FormField::Email => Some(&mut self.email),
            FormField::Password => Some(&mut self.password),
            FormField::ConfirmPassword => Some(&mut self.confirm_password),
            FormField::Username => Some(&mut self.username),
            FormField::Description => Some(&mut self.description),
            FormField::Phone => Some(&mut self.phone),
            FormField::Country => Some(&mut self.country),
            FormField::District => Some(&mut self.district),
            FormField::Division => Some(&mut self.division),
            FormField::PostalCode => Some(&mut self.postal_code),
            FormField::IdNumber => Some(&mut self.id_number),
            _ => None,
        }
    }

    fn file_slot(&mut self, field: FormField) -> Option<&mut Option<Option<FileHandle>>> {
        match field {
            FormField::FrontImage => Some(&mut self.front_image),
            FormField::BackImage => Some(&mut self.back_image),
            FormField::ProfileImage => Some(&mut self.profile_image),
            _ => None,
        }
    }
}
