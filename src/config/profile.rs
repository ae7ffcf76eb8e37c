use crate::domain::model::{LocationDescriptor, OfferDescriptor, ServiceDescriptor};
use crate::utils::error::{Result, SchemaError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Everything the schema builder needs to know about the business.
///
/// `SiteProfile::default()` carries the built-in catalogs; a TOML profile
/// replaces any section it names and keeps the defaults for the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    pub business: BusinessProfile,
    pub founder: FounderProfile,
    pub services: Vec<ServiceDescriptor>,
    pub locations: Vec<LocationDescriptor>,
    pub specializations: Vec<SpecializationDescriptor>,
    pub faq: FaqProfile,
    pub reviews: ReviewPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub name: String,
    /// Used when the page URL has no usable origin.
    pub fallback_base_url: String,
    pub logo_path: String,
    pub logo_description: String,
    pub telephone: String,
    /// Number published on the Organization's contact point.
    pub customer_service_telephone: String,
    pub email: String,
    pub description: String,
    pub short_description: String,
    pub about: String,
    pub founded: String,
    pub language: String,
    pub price_range: String,
    pub contact_area: String,
    pub latitude: f64,
    pub longitude: f64,
    pub areas_served: Vec<String>,
    pub professional_areas_served: Vec<String>,
    pub knows_about: Vec<String>,
    pub professional_knows_about: Vec<String>,
    pub same_as: Vec<String>,
    pub address: AddressProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressProfile {
    pub street_address: String,
    pub locality: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FounderProfile {
    pub name: String,
    pub job_title: String,
    pub image_path: String,
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecializationDescriptor {
    pub name: String,
    pub description: String,
    /// Site-relative page that describes the specialization.
    pub page_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqProfile {
    pub page_path: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewPolicy {
    pub missing_rating: MissingRatingPolicy,
}

/// What to do with a testimonial whose stars element has no `★` in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRatingPolicy {
    /// Publish the review with the best rating (5).
    #[default]
    DefaultToBest,
    /// Leave the card out of the review list.
    Skip,
}

impl Default for AddressProfile {
    fn default() -> Self {
        Self {
            street_address: "318 South St SE".to_string(),
            locality: "Leesburg".to_string(),
            region: "VA".to_string(),
            postal_code: "20175".to_string(),
            country: "US".to_string(),
        }
    }
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: "Ricky Horseman Companies".to_string(),
            fallback_base_url: "https://www.rickyhorseman.com".to_string(),
            logo_path: "/Assets/logo%20just%20icon.png".to_string(),
            logo_description: "Logo for Ricky Horseman Companies - concrete construction and snow removal services".to_string(),
            telephone: "+1-703-737-0713".to_string(),
            customer_service_telephone: "+1-000-000-0000".to_string(),
            email: "info@rickyhorseman.com".to_string(),
            description: "Professional concrete construction, snow removal services, and data center site services for Northern Virginia. Specializing in concrete foundations, flatwork, snow removal contracts, and critical facility support.".to_string(),
            short_description: "Professional concrete construction, snow removal services, and data center site services".to_string(),
            about: "Professional concrete construction, snow removal services, and data center site services for Northern Virginia. Over 30 years of experience serving Leesburg, Ashburn, Loudoun County, and surrounding areas.".to_string(),
            founded: "1991-01-01".to_string(),
            language: "en-US".to_string(),
            price_range: "$$".to_string(),
            contact_area: "Northern Virginia".to_string(),
            latitude: 38.9818,
            longitude: -77.6219,
            areas_served: strings(&[
                "Leesburg",
                "Ashburn",
                "Purcellville",
                "Hamilton",
                "Lovettsville",
                "Loudoun County",
                "Prince William County",
                "Fairfax County",
                "Northern Virginia",
            ]),
            professional_areas_served: strings(&[
                "Leesburg, VA",
                "Ashburn, VA",
                "Purcellville, VA",
                "Loudoun County, VA",
                "Prince William County, VA",
                "Northern Virginia",
            ]),
            knows_about: strings(&[
                "Concrete Construction",
                "Snow Removal Services",
                "Data Center Concrete",
                "Site Preparation",
                "Ice Management",
                "Specialty Concrete",
            ]),
            professional_knows_about: strings(&[
                "Concrete Construction",
                "Snow Removal",
                "Data Center Services",
                "Site Preparation",
                "Ice Management",
            ]),
            same_as: Vec::new(),
            address: AddressProfile::default(),
        }
    }
}

impl Default for FounderProfile {
    fn default() -> Self {
        Self {
            name: "Ricky Horseman".to_string(),
            job_title: "President".to_string(),
            image_path: "/Assets/ricky.png".to_string(),
            same_as: Vec::new(),
        }
    }
}

impl Default for FaqProfile {
    fn default() -> Self {
        Self {
            page_path: "/faq.html".to_string(),
            name: "Frequently Asked Questions - Ricky Horseman Companies".to_string(),
            description: "Common questions about concrete construction, snow removal services, and data center site services in Northern Virginia".to_string(),
        }
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            business: BusinessProfile::default(),
            founder: FounderProfile::default(),
            services: default_services(),
            locations: default_locations(),
            specializations: default_specializations(),
            faq: FaqProfile::default(),
            reviews: ReviewPolicy::default(),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_services() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor {
            name: "Concrete Construction".to_string(),
            description: "Professional concrete construction: foundations, flatwork, slabs, pads, repairs for residential and commercial projects in Northern Virginia.".to_string(),
            area_served: strings(&["Northern Virginia", "Loudoun County", "Fairfax County"]),
            keywords: "concrete construction, foundations, flatwork, concrete slabs, concrete pads".to_string(),
            price_range: "$$".to_string(),
            availability: "Available".to_string(),
            offers: None,
            specialization: None,
        },
        ServiceDescriptor {
            name: "Specialty Concrete & Sport Courts".to_string(),
            description: "Custom concrete surfaces for sport courts, recreational areas, and specialty installations with professional finishing.".to_string(),
            area_served: strings(&["Northern Virginia"]),
            keywords: "sport courts, specialty concrete, recreational surfaces, tennis courts".to_string(),
            price_range: "$$$".to_string(),
            availability: "Available".to_string(),
            offers: None,
            specialization: None,
        },
        ServiceDescriptor {
            name: "Site & Property Services".to_string(),
            description: "Site preparation, access areas, equipment pads, grading, and property support for residential and commercial clients.".to_string(),
            area_served: strings(&["Northern Virginia", "Loudoun County"]),
            keywords: "site preparation, site services, equipment pads, property services".to_string(),
            price_range: "$$".to_string(),
            availability: "Available".to_string(),
            offers: None,
            specialization: None,
        },
        ServiceDescriptor {
            name: "Snow Removal & Facility Support".to_string(),
            description: "Emergency snow removal and ice management with seasonal contracts and 24/7 response for residential and commercial properties.".to_string(),
            area_served: strings(&[
                "Northern Virginia",
                "Loudoun County",
                "Prince William County",
                "Fairfax County",
            ]),
            keywords: "snow removal, ice management, snow removal services, snow removal contracts, emergency snow removal".to_string(),
            price_range: "$$".to_string(),
            availability: "Seasonal (November-March)".to_string(),
            offers: Some(vec![
                OfferDescriptor {
                    name: "Emergency Snow Removal".to_string(),
                    price: "Call for quote".to_string(),
                },
                OfferDescriptor {
                    name: "Seasonal Snow Removal Contracts".to_string(),
                    price: "Call for quote".to_string(),
                },
                OfferDescriptor {
                    name: "Ice Management & De-icing".to_string(),
                    price: "Call for quote".to_string(),
                },
            ]),
            specialization: None,
        },
        ServiceDescriptor {
            name: "Data Center Concrete & Site Services".to_string(),
            description: "Specialized concrete and site services for data center campuses: equipment pads, foundations, demolition, and precision work.".to_string(),
            area_served: strings(&["Northern Virginia", "Loudoun County", "Prince William County"]),
            keywords: "data center concrete, critical facility services, data center site services, controlled-access facilities".to_string(),
            price_range: "$$$".to_string(),
            availability: "Available".to_string(),
            offers: None,
            specialization: Some(
                "Mission-critical facilities, 24/7 coordination, precision tolerances".to_string(),
            ),
        },
    ]
}

fn default_locations() -> Vec<LocationDescriptor> {
    vec![
        LocationDescriptor {
            location: "Leesburg, VA".to_string(),
            latitude: 39.1166,
            longitude: -77.5755,
        },
        LocationDescriptor {
            location: "Ashburn, VA".to_string(),
            latitude: 39.0438,
            longitude: -77.4874,
        },
        LocationDescriptor {
            location: "Loudoun County, VA".to_string(),
            latitude: 39.1,
            longitude: -77.7,
        },
    ]
}

fn default_specializations() -> Vec<SpecializationDescriptor> {
    vec![
        SpecializationDescriptor {
            name: "Data Center Concrete Specialization".to_string(),
            description: "Specialized concrete services for mission-critical data center facilities with 24/7 coordination, precision tolerances, and equipment pad installation".to_string(),
            page_path: "/data-centers.html".to_string(),
        },
        SpecializationDescriptor {
            name: "Snow Removal & Ice Management Specialization".to_string(),
            description: "Professional emergency snow removal and ice management services with seasonal contracts and 24/7 response capability".to_string(),
            page_path: "/seasonal-facility-support.html".to_string(),
        },
    ]
}

impl SiteProfile {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SchemaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定，未出現的區段沿用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SchemaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SITE_PHONE})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SchemaError::ConfigError {
            message: format!("TOML serialization error: {}", e),
        })
    }
}

impl Validate for SiteProfile {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("business.name", &self.business.name)?;
        validation::validate_url("business.fallback_base_url", &self.business.fallback_base_url)?;
        validation::validate_coordinates(
            "business",
            self.business.latitude,
            self.business.longitude,
        )?;

        for (i, service) in self.services.iter().enumerate() {
            validation::validate_non_empty_string(&format!("services[{}].name", i), &service.name)?;
        }

        for (i, location) in self.locations.iter().enumerate() {
            let field = format!("locations[{}]", i);
            validation::validate_non_empty_string(&format!("{}.location", field), &location.location)?;
            validation::validate_coordinates(&field, location.latitude, location.longitude)?;
        }

        if !self.faq.page_path.starts_with('/') {
            return Err(SchemaError::InvalidConfigValueError {
                field: "faq.page_path".to_string(),
                value: self.faq.page_path.clone(),
                reason: "Page path must start with '/'".to_string(),
            });
        }

        Ok(())
    }
}
