//! Wire types for the Chinook catalog REST API.
//!
//! Field names follow the backend exactly: table columns are PascalCase
//! (`TrackId`, `UnitPrice`) while derived fields are snake_case
//! (`artist_name`). Nullable columns are `Option`s and every monetary amount
//! is a [`Price`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use chinook_core::{
    AlbumId, ArtistId, CustomerId, Email, EmployeeId, GenreId, InvoiceId, InvoiceLineId,
    MediaTypeId, Price, TrackId,
};

// =============================================================================
// Query Parameters
// =============================================================================

/// Page selection shared by every list endpoint.
///
/// The backend defaults to page 1 with 50 items and caps `page_size` at 100.
/// Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Pagination plus free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Filters for the album listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<ArtistId>,
}

/// Filters for the track listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<AlbumId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<GenreId>,
}

/// Filters for the invoice listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Artist {
    pub artist_id: ArtistId,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistList {
    pub artists: Vec<Artist>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Album {
    pub album_id: AlbumId,
    pub title: String,
    pub artist_id: ArtistId,
}

/// An album with its artist and, on the detail endpoint, its tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDetail {
    #[serde(flatten)]
    pub album: Album,
    #[serde(default)]
    pub artist: Option<Artist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumList {
    pub albums: Vec<AlbumDetail>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    pub genre_id: GenreId,
    pub name: Option<String>,
}

/// The genre list is small and returned unpaginated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Track {
    pub track_id: TrackId,
    pub name: String,
    #[serde(default)]
    pub album_id: Option<AlbumId>,
    pub media_type_id: MediaTypeId,
    #[serde(default)]
    pub genre_id: Option<GenreId>,
    #[serde(default)]
    pub composer: Option<String>,
    pub milliseconds: u32,
    pub unit_price: Price,
}

/// A purchasable track with the names the listing denormalizes for display.
///
/// This is the catalog item held by cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDetail {
    #[serde(flatten)]
    pub track: Track,
    #[serde(default)]
    pub album: Option<Album>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub genre_name: Option<String>,
}

impl TrackDetail {
    #[must_use]
    pub const fn id(&self) -> TrackId {
        self.track.track_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.track.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.track.unit_price
    }

    /// Duration formatted as `m:ss`.
    #[must_use]
    pub fn duration(&self) -> String {
        let seconds = self.track.milliseconds / 1000;
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackList {
    pub tracks: Vec<TrackDetail>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    pub email: String,
    #[serde(default)]
    pub support_rep_id: Option<EmployeeId>,
}

impl Customer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating a customer.
///
/// The email is validated locally so a malformed address never reaches the
/// backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_rep_id: Option<EmployeeId>,
}

impl CustomerCreate {
    /// A create payload with only the required fields set.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, email: Email) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email,
            company: None,
            address: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
            phone: None,
            fax: None,
            support_rep_id: None,
        }
    }

    /// Blank optional fields become absent, and names are trimmed.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.first_name = self.first_name.trim().to_owned();
        self.last_name = self.last_name.trim().to_owned();
        for field in [
            &mut self.company,
            &mut self.address,
            &mut self.city,
            &mut self.state,
            &mut self.country,
            &mut self.postal_code,
            &mut self.phone,
            &mut self.fax,
        ] {
            *field = non_blank(field.take());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerList {
    pub customers: Vec<Customer>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

// =============================================================================
// Invoices
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    pub invoice_id: InvoiceId,
    pub customer_id: CustomerId,
    pub invoice_date: NaiveDateTime,
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default)]
    pub billing_city: Option<String>,
    #[serde(default)]
    pub billing_state: Option<String>,
    #[serde(default)]
    pub billing_country: Option<String>,
    #[serde(default)]
    pub billing_postal_code: Option<String>,
    pub total: Price,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
}

/// One invoice line with the track, artist and album names denormalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemDetail {
    #[serde(rename = "InvoiceLineId")]
    pub invoice_line_id: InvoiceLineId,
    #[serde(rename = "InvoiceId")]
    pub invoice_id: InvoiceId,
    #[serde(rename = "TrackId")]
    pub track_id: TrackId,
    #[serde(rename = "UnitPrice")]
    pub unit_price: Price,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    #[serde(default)]
    pub items: Vec<InvoiceItemDetail>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub employee_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceList {
    pub invoices: Vec<Invoice>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// One requested line of a new invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceItemCreate {
    pub track_id: TrackId,
    pub quantity: u32,
}

/// Optional billing fields collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// Payload for creating an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceCreate {
    pub customer_id: CustomerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_postal_code: Option<String>,
    #[serde(rename = "items")]
    pub items: Vec<InvoiceItemCreate>,
}

impl InvoiceCreate {
    /// Build an invoice payload; blank billing fields are sent as absent.
    #[must_use]
    pub fn new(
        customer_id: CustomerId,
        employee_id: Option<EmployeeId>,
        billing: BillingAddress,
        items: Vec<InvoiceItemCreate>,
    ) -> Self {
        Self {
            customer_id,
            employee_id,
            billing_address: non_blank(billing.address),
            billing_city: non_blank(billing.city),
            billing_state: non_blank(billing.state),
            billing_country: non_blank(billing.country),
            billing_postal_code: non_blank(billing.postal_code),
            items,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_detail_from_backend_json() {
        let body = json!({
            "TrackId": 1,
            "Name": "For Those About To Rock (We Salute You)",
            "AlbumId": 1,
            "MediaTypeId": 1,
            "GenreId": 1,
            "Composer": "Angus Young, Malcolm Young, Brian Johnson",
            "Milliseconds": 343_719,
            "UnitPrice": "0.99",
            "album": {"AlbumId": 1, "Title": "For Those About To Rock We Salute You", "ArtistId": 1},
            "artist_name": "AC/DC",
            "genre_name": "Rock"
        });

        let track: TrackDetail = serde_json::from_value(body).unwrap();
        assert_eq!(track.id(), TrackId::new(1));
        assert_eq!(track.unit_price(), Price::parse("0.99").unwrap());
        assert_eq!(track.artist_name.as_deref(), Some("AC/DC"));
        assert_eq!(track.duration(), "5:43");
    }

    #[test]
    fn test_track_detail_tolerates_nulls() {
        let body = json!({
            "TrackId": 2,
            "Name": "Balls to the Wall",
            "AlbumId": null,
            "MediaTypeId": 2,
            "GenreId": null,
            "Composer": null,
            "Milliseconds": 342_562,
            "UnitPrice": "0.99"
        });

        let track: TrackDetail = serde_json::from_value(body).unwrap();
        assert!(track.album.is_none());
        assert!(track.track.composer.is_none());
    }

    #[test]
    fn test_invoice_create_wire_shape() {
        let billing = BillingAddress {
            address: Some("  ".to_string()),
            city: Some(" Prague ".to_string()),
            ..BillingAddress::default()
        };
        let create = InvoiceCreate::new(
            CustomerId::new(5),
            None,
            billing,
            vec![InvoiceItemCreate {
                track_id: TrackId::new(3),
                quantity: 2,
            }],
        );

        let value = serde_json::to_value(&create).unwrap();
        assert_eq!(
            value,
            json!({
                "CustomerId": 5,
                "BillingCity": "Prague",
                "items": [{"TrackId": 3, "Quantity": 2}]
            })
        );
    }

    #[test]
    fn test_invoice_detail_parses_dates_and_totals() {
        let body = json!({
            "InvoiceId": 412,
            "CustomerId": 58,
            "InvoiceDate": "2013-12-22T00:00:00",
            "BillingAddress": "12,Community Centre",
            "BillingCity": "Delhi",
            "BillingState": null,
            "BillingCountry": "India",
            "BillingPostalCode": "110017",
            "Total": "1.99",
            "EmployeeId": null,
            "items": [{
                "InvoiceLineId": 2240,
                "InvoiceId": 412,
                "TrackId": 3177,
                "UnitPrice": "1.99",
                "Quantity": 1,
                "track_name": "Hot Girl",
                "artist_name": "The Office",
                "album_title": "The Office, Season 1"
            }],
            "customer_name": "Manoj Pareek",
            "employee_name": null
        });

        let invoice: InvoiceDetail = serde_json::from_value(body).unwrap();
        assert_eq!(invoice.invoice.total.display(), "1.99");
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.invoice.invoice_date.to_string(), "2013-12-22 00:00:00");
    }

    #[test]
    fn test_track_filters_query_only_sends_set_fields() {
        let filters = TrackFilters {
            page: Some(2),
            search: Some("rock".to_string()),
            genre_id: Some(GenreId::new(1)),
            ..TrackFilters::default()
        };

        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(value, json!({"page": 2, "search": "rock", "genre_id": 1}));
    }

    #[test]
    fn test_customer_create_normalized() {
        let mut create = CustomerCreate::new(
            " Astrid ",
            "Gruber",
            Email::parse("astrid.gruber@apple.at").unwrap(),
        );
        create.phone = Some(String::new());
        create.city = Some("Vienne".to_string());

        let create = create.normalized();
        assert_eq!(create.first_name, "Astrid");
        assert!(create.phone.is_none());

        let value = serde_json::to_value(&create).unwrap();
        assert_eq!(
            value,
            json!({
                "FirstName": "Astrid",
                "LastName": "Gruber",
                "Email": "astrid.gruber@apple.at",
                "City": "Vienne"
            })
        );
    }
}
