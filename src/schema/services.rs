use crate::config::profile::SiteProfile;
use crate::domain::model::ServiceDescriptor;
use crate::schema::types::{
    GeoCoordinates, LocationBusiness, Named, NodeRef, Offer, PostalAddress, Service,
    SCHEMA_CONTEXT,
};

const PRICE_CURRENCY: &str = "USD";

/// Maps the service catalog to `Service` nodes provided by `provider_id`.
pub fn build_service_schemas(services: &[ServiceDescriptor], provider_id: &str) -> Vec<Service> {
    services
        .iter()
        .map(|service| Service {
            context: SCHEMA_CONTEXT,
            kind: "Service",
            name: service.name.clone(),
            description: service.description.clone(),
            provider: NodeRef {
                id: provider_id.to_string(),
            },
            area_served: service
                .area_served
                .iter()
                .map(|area| Named::new("City", area.as_str()))
                .collect(),
            keywords: service.keywords.clone(),
            price_range: service.price_range.clone(),
            availability: service.availability.clone(),
            offers: service.offers.as_ref().map(|offers| {
                offers
                    .iter()
                    .map(|offer| Offer {
                        kind: "Offer",
                        name: offer.name.clone(),
                        price: offer.price.clone(),
                        price_currency: PRICE_CURRENCY,
                    })
                    .collect()
            }),
            specialization: service.specialization.clone(),
        })
        .collect()
}

/// One `LocalBusiness` node per configured service area.
pub fn build_location_schemas(profile: &SiteProfile, base_url: &str) -> Vec<LocationBusiness> {
    let business = &profile.business;

    profile
        .locations
        .iter()
        .map(|loc| LocationBusiness {
            context: SCHEMA_CONTEXT,
            kind: "LocalBusiness",
            name: format!("{} - {}", business.name, loc.location),
            description: format!(
                "Concrete construction, snow removal, and data center services in {}",
                loc.location
            ),
            address: PostalAddress {
                kind: "PostalAddress",
                street_address: business.address.street_address.clone(),
                address_locality: loc.locality().to_string(),
                address_region: business.address.region.clone(),
                postal_code: None,
                address_country: business.address.country.clone(),
            },
            geo: GeoCoordinates::new(loc.latitude, loc.longitude),
            telephone: business.telephone.clone(),
            email: business.email.clone(),
            url: base_url.to_string(),
            area_served: loc.location.clone(),
        })
        .collect()
}
