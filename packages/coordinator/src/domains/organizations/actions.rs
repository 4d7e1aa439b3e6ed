//! Store-backed operations on organizations and profiles.

use anyhow::{Context, Result};
use chrono::Utc;
use rowstore::{require, Filter, Guard, RowStore, SortOrder};
use serde_json::json;
use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{OrgId, ProfileId};
use crate::domains::availability::WeeklySchedule;

use super::models::{Organization, Profile, Role, ENTITY, PROFILE_ENTITY};

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewOrganization<'a> {
    pub name: &'a str,
    #[builder(default)]
    pub address: Option<&'a str>,
    #[builder(default)]
    pub phone: Option<&'a str>,
    #[builder(default)]
    pub email: Option<&'a str>,
}

/// How an onboarding user attaches to an organization.
pub enum OrgChoice<'a> {
    /// Join an existing organization as a member.
    Existing(OrgId),
    /// Found a new organization and become its admin.
    New(NewOrganization<'a>),
}

/// All organizations, ordered by name.
pub async fn directory(store: &dyn RowStore) -> Result<Vec<Organization>> {
    let rows = store
        .select(ENTITY, Filter::new().order("name", SortOrder::Ascending))
        .await?;
    rows.iter().map(Organization::from_row).collect()
}

pub async fn fetch(store: &dyn RowStore, id: OrgId) -> Result<Organization> {
    let row = require(store, ENTITY, id.into_uuid()).await?;
    Organization::from_row(&row)
}

pub async fn create_organization(
    store: &dyn RowStore,
    params: &NewOrganization<'_>,
) -> Result<Organization> {
    let fields = json!({
        "name": params.name,
        "address": params.address,
        "phone": params.phone,
        "email": params.email,
        "description": null,
        "availability": null,
        "created_at": Utc::now(),
    })
    .as_object()
    .cloned()
    .context("organization fields must serialize to an object")?;

    let row = store.insert(ENTITY, fields).await?;
    let org = Organization::from_row(&row)?;
    info!(org_id = %org.id, name = %org.name, "Organization created");
    Ok(org)
}

/// Onboard a user: join or found an organization, then create the profile.
pub async fn onboard(
    store: &dyn RowStore,
    full_name: &str,
    choice: OrgChoice<'_>,
) -> Result<Profile> {
    let (org_id, role) = match choice {
        OrgChoice::Existing(id) => (id, Role::Member),
        OrgChoice::New(params) => {
            let org = create_organization(store, &params).await?;
            (org.id, Role::Admin)
        }
    };

    let fields = json!({
        "organization_id": org_id,
        "full_name": full_name,
        "role": role.to_string(),
    })
    .as_object()
    .cloned()
    .context("profile fields must serialize to an object")?;

    let row = store.insert(PROFILE_ENTITY, fields).await?;
    Profile::from_row(&row)
}

/// Update the editable organization details.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganization<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub description: Option<&'a str>,
}

pub async fn update_details(
    store: &dyn RowStore,
    id: OrgId,
    params: &UpdateOrganization<'_>,
) -> Result<Organization> {
    let mut fields = rowstore::Fields::new();
    for (column, value) in [
        ("name", params.name),
        ("address", params.address),
        ("phone", params.phone),
        ("email", params.email),
        ("description", params.description),
    ] {
        if let Some(value) = value {
            fields.insert(column.to_string(), json!(value));
        }
    }
    let row = store
        .update(ENTITY, id.into_uuid(), fields, Guard::None)
        .await?;
    Organization::from_row(&row)
}

/// The organization's published pickup hours, if any.
pub async fn load_availability(
    store: &dyn RowStore,
    id: OrgId,
) -> Result<Option<WeeklySchedule>> {
    let row = require(store, ENTITY, id.into_uuid()).await?;
    match row.get("availability") {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .context("Invalid availability field")
            .map(Some),
    }
}

pub async fn save_availability(
    store: &dyn RowStore,
    id: OrgId,
    schedule: &WeeklySchedule,
) -> Result<()> {
    let mut fields = rowstore::Fields::new();
    fields.insert(
        "availability".to_string(),
        serde_json::to_value(schedule).context("Schedule must serialize")?,
    );
    store
        .update(ENTITY, id.into_uuid(), fields, Guard::None)
        .await?;
    info!(org_id = %id, "Availability updated");
    Ok(())
}

/// Profiles belonging to an organization, ordered by name.
pub async fn members(store: &dyn RowStore, org_id: OrgId) -> Result<Vec<Profile>> {
    let rows = store
        .select(
            PROFILE_ENTITY,
            Filter::new()
                .eq("organization_id", org_id.to_string())
                .order("full_name", SortOrder::Ascending),
        )
        .await?;
    rows.iter().map(Profile::from_row).collect()
}

pub async fn fetch_profile(store: &dyn RowStore, id: ProfileId) -> Result<Profile> {
    let row = require(store, PROFILE_ENTITY, id.into_uuid()).await?;
    Profile::from_row(&row)
}
