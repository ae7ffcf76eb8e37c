use crate::config::profile::SiteProfile;
use crate::document::Document;
use crate::schema::breadcrumbs::build_breadcrumbs;
use crate::schema::reviews::{aggregate_rating, build_review_schemas};
use crate::schema::services::{build_location_schemas, build_service_schemas};
use crate::schema::types::*;
use crate::schema::{resolve_base_url, SEO_SCHEMA_ID};
use crate::utils::error::Result;
use serde::Serialize;
use url::Url;

/// Base URL and the stable node identifiers derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIds {
    pub base_url: String,
    pub organization: String,
    pub business: String,
    pub founder: String,
}

impl SchemaIds {
    pub fn resolve(page_url: Option<&Url>, profile: &SiteProfile) -> Self {
        let base_url = resolve_base_url(page_url, &profile.business.fallback_base_url);
        Self {
            organization: format!("{}#organization", base_url),
            business: format!("{}#business", base_url),
            founder: format!("{}#founder", base_url),
            base_url,
        }
    }
}

/// The ordered business graph written under [`SEO_SCHEMA_ID`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaGraph {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphSummary {
    pub entity_count: usize,
    pub review_count: usize,
    pub breadcrumb_count: usize,
    pub has_aggregate_rating: bool,
}

impl SchemaGraph {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count_of(&self, type_name: &str) -> usize {
        self.entities
            .iter()
            .filter(|e| e.type_name() == type_name)
            .count()
    }

    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary {
            entity_count: self.entities.len(),
            ..GraphSummary::default()
        };
        for entity in &self.entities {
            match entity {
                Entity::LocalBusiness(b) => {
                    summary.review_count = b.review.as_ref().map_or(0, Vec::len);
                }
                Entity::BreadcrumbList(list) => {
                    summary.breadcrumb_count = list.item_list_element.len();
                }
                Entity::AggregateRating(_) => summary.has_aggregate_rating = true,
                _ => {}
            }
        }
        summary
    }
}

fn postal_address(profile: &SiteProfile) -> PostalAddress {
    let address = &profile.business.address;
    PostalAddress {
        kind: "PostalAddress",
        street_address: address.street_address.clone(),
        address_locality: address.locality.clone(),
        address_region: address.region.clone(),
        postal_code: Some(address.postal_code.clone()),
        address_country: address.country.clone(),
    }
}

/// Builds the full business graph for one page.
///
/// The fixed nodes always come first; per-service and per-location nodes
/// follow, then breadcrumbs and the aggregate rating when the page has the
/// content for them.
pub fn build_seo_graph(document: &Document, page_url: Option<&Url>, profile: &SiteProfile) -> SchemaGraph {
    let ids = SchemaIds::resolve(page_url, profile);
    let base = ids.base_url.as_str();
    let business = &profile.business;
    let founder = &profile.founder;
    let logo_url = format!("{}{}", base, business.logo_path);

    let organization = Organization {
        context: SCHEMA_CONTEXT,
        kind: "Organization",
        id: ids.organization.clone(),
        name: business.name.clone(),
        url: base.to_string(),
        logo: logo_url.clone(),
        contact_point: ContactPoint {
            context: None,
            kind: "ContactPoint",
            contact_type: "customer service".to_string(),
            telephone: business.customer_service_telephone.clone(),
            email: None,
            area_served: "US".to_string(),
            available_language: None,
        },
    };

    let reviews = build_review_schemas(document, profile.reviews.missing_rating);
    let local_business = LocalBusiness {
        context: SCHEMA_CONTEXT,
        kind: "HomeAndConstructionBusiness",
        id: ids.business.clone(),
        name: business.name.clone(),
        image: logo_url.clone(),
        url: base.to_string(),
        telephone: business.telephone.clone(),
        email: business.email.clone(),
        description: business.description.clone(),
        address: postal_address(profile),
        geo: GeoCoordinates::new(business.latitude, business.longitude),
        area_served: business.areas_served.clone(),
        price_range: business.price_range.clone(),
        knows_about: business.knows_about.clone(),
        same_as: business.same_as.clone(),
        review: (!reviews.is_empty()).then_some(reviews),
    };

    let person = Person {
        context: SCHEMA_CONTEXT,
        kind: "Person",
        id: ids.founder.clone(),
        name: founder.name.clone(),
        job_title: founder.job_title.clone(),
        works_for: NodeRef {
            id: ids.organization.clone(),
        },
        image: format!("{}{}", base, founder.image_path),
        email: business.email.clone(),
        telephone: business.telephone.clone(),
        same_as: founder.same_as.clone(),
    };

    let website = WebSite {
        context: SCHEMA_CONTEXT,
        kind: "WebSite",
        name: business.name.clone(),
        url: base.to_string(),
        potential_action: SearchAction {
            kind: "SearchAction",
            target: format!("{}/search?q={{search_term_string}}", base),
            query_input: "required name=search_term_string".to_string(),
        },
    };

    let professional_service = ProfessionalService {
        context: SCHEMA_CONTEXT,
        kind: "ProfessionalService",
        name: business.name.clone(),
        description: business.short_description.clone(),
        url: base.to_string(),
        telephone: business.telephone.clone(),
        email: business.email.clone(),
        address: postal_address(profile),
        area_served: business.professional_areas_served.clone(),
        price_range: business.price_range.clone(),
        knows_about: business.professional_knows_about.clone(),
    };

    let image = ImageObject {
        context: SCHEMA_CONTEXT,
        kind: "ImageObject",
        url: logo_url,
        name: format!("{} Logo", business.name),
        description: business.logo_description.clone(),
    };

    let creative_work = CreativeWork {
        context: SCHEMA_CONTEXT,
        kind: "CreativeWork",
        name: business.name.clone(),
        description: business.about.clone(),
        author: Named::new("Person", founder.name.as_str()),
        date_published: business.founded.clone(),
        in_language: business.language.clone(),
    };

    let contact_point = ContactPoint {
        context: Some(SCHEMA_CONTEXT),
        kind: "ContactPoint",
        contact_type: "Customer Service".to_string(),
        telephone: business.telephone.clone(),
        email: Some(business.email.clone()),
        area_served: business.contact_area.clone(),
        available_language: Some("en".to_string()),
    };

    let mut entities = vec![
        Entity::Organization(organization),
        Entity::LocalBusiness(Box::new(local_business)),
        Entity::Person(person),
        Entity::WebSite(website),
        Entity::ProfessionalService(professional_service),
        Entity::ImageObject(image),
        Entity::CreativeWork(creative_work),
        Entity::ContactPoint(contact_point),
    ];

    entities.extend(profile.specializations.iter().map(|spec| {
        Entity::Thing(Thing {
            context: SCHEMA_CONTEXT,
            kind: "Thing",
            name: spec.name.clone(),
            description: spec.description.clone(),
            same_as: format!("{}{}", base, spec.page_path),
        })
    }));

    entities.extend(
        build_service_schemas(&profile.services, &ids.business)
            .into_iter()
            .map(Entity::Service),
    );
    entities.extend(
        build_location_schemas(profile, base)
            .into_iter()
            .map(Entity::LocationBusiness),
    );

    if let Some(breadcrumbs) = build_breadcrumbs(document, page_url, base) {
        entities.push(Entity::BreadcrumbList(breadcrumbs));
    }

    if let Some(aggregate) = aggregate_rating(document, base) {
        entities.push(Entity::AggregateRating(aggregate));
    }

    SchemaGraph { entities }
}

/// Builds the business graph and writes it into the page head, replacing
/// any previous graph script.
pub fn inject_seo_schema(
    document: &mut Document,
    page_url: Option<&Url>,
    profile: &SiteProfile,
) -> Result<GraphSummary> {
    let graph = build_seo_graph(document, page_url, profile);
    document.upsert_json_ld(SEO_SCHEMA_ID, &graph)?;

    let summary = graph.summary();
    tracing::debug!(
        "Injected SEO schema: {} entities, {} reviews, {} breadcrumbs",
        summary.entity_count,
        summary.review_count,
        summary.breadcrumb_count
    );
    Ok(summary)
}
