//! schema.org entity shapes emitted into the JSON-LD script elements.
//!
//! Field order follows the order the site has always published, so diffs of
//! generated pages stay small.

use serde::Serialize;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// `{"@id": ...}` reference to another node of the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRef {
    #[serde(rename = "@id")]
    pub id: String,
}

/// `{"@type": ..., "name": ...}`; used for cities, authors and publishers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Named {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

impl Named {
    pub fn new(kind: &'static str, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub street_address: String,
    pub address_locality: String,
    pub address_region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub address_country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoCoordinates {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            kind: "GeoCoordinates",
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<&'static str>,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub contact_type: String,
    pub telephone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub area_served: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub url: String,
    pub logo: String,
    pub contact_point: ContactPoint,
}

/// The main business node (`HomeAndConstructionBusiness`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalBusiness {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub url: String,
    pub telephone: String,
    pub email: String,
    pub description: String,
    pub address: PostalAddress,
    pub geo: GeoCoordinates,
    pub area_served: Vec<String>,
    pub price_range: String,
    pub knows_about: Vec<String>,
    pub same_as: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Vec<Review>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub job_title: String,
    pub works_for: NodeRef,
    pub image: String,
    pub email: String,
    pub telephone: String,
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchAction {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub target: String,
    #[serde(rename = "query-input")]
    pub query_input: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSite {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub potential_action: SearchAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalService {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    pub telephone: String,
    pub email: String,
    pub address: PostalAddress,
    pub area_served: Vec<String>,
    pub price_range: String,
    pub knows_about: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeWork {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub author: Named,
    pub date_published: String,
    pub in_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thing {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub same_as: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub price: String,
    pub price_currency: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub provider: NodeRef,
    pub area_served: Vec<Named>,
    pub keywords: String,
    pub price_range: String,
    pub availability: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers: Option<Vec<Offer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

/// Per-area `LocalBusiness` node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationBusiness {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub address: PostalAddress,
    pub geo: GeoCoordinates,
    pub telephone: String,
    pub email: String,
    pub url: String,
    pub area_served: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub rating_value: u32,
    pub best_rating: u32,
    pub worst_rating: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub review_body: String,
    pub author: Named,
    pub review_rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Named>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub item_list_element: Vec<ListItem>,
}

/// Rating values are strings here, the way the site has always published them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub rating_value: String,
    pub best_rating: String,
    pub worst_rating: String,
    pub rating_count: usize,
    pub review_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub main_entity: Vec<Question>,
    pub url: String,
    pub name: String,
    pub description: String,
}

/// One node of the business graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Organization(Organization),
    LocalBusiness(Box<LocalBusiness>),
    Person(Person),
    WebSite(WebSite),
    ProfessionalService(ProfessionalService),
    ImageObject(ImageObject),
    CreativeWork(CreativeWork),
    ContactPoint(ContactPoint),
    Thing(Thing),
    Service(Service),
    LocationBusiness(LocationBusiness),
    BreadcrumbList(BreadcrumbList),
    AggregateRating(AggregateRating),
}

impl Entity {
    /// Value of the node's `@type`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Entity::Organization(e) => e.kind,
            Entity::LocalBusiness(e) => e.kind,
            Entity::Person(e) => e.kind,
            Entity::WebSite(e) => e.kind,
            Entity::ProfessionalService(e) => e.kind,
            Entity::ImageObject(e) => e.kind,
            Entity::CreativeWork(e) => e.kind,
            Entity::ContactPoint(e) => e.kind,
            Entity::Thing(e) => e.kind,
            Entity::Service(e) => e.kind,
            Entity::LocationBusiness(e) => e.kind,
            Entity::BreadcrumbList(e) => e.kind,
            Entity::AggregateRating(e) => e.kind,
        }
    }
}
