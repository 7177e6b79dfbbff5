//! The fixed FedEx Ship Manager address-book schema.
//!
//! The output CSV always has the same 65 columns in the same order. The
//! mapping from column name to [`ColumnRule`] is static configuration data,
//! built once before any record is processed and shared read-only by all
//! workers. Columns without a mapping always render empty.

use once_cell::sync::Lazy;

use crate::transform::rules::ColumnRule;

/// Attribute key carrying the receiver's ISO country code.
pub const COUNTRY_ATTRIBUTE: &str = "country";

/// Countries whose addresses get Germanic digraph expansion (Ä→Ae etc.).
pub const GERMANIC_COUNTRIES: [&str; 3] = ["DE", "AT", "CH"];

/// The 65 output columns, in FedEx import order.
pub const HEADER_COLUMNS: [&str; 65] = [
    "Nickname",
    "FullName",
    "FirstName",
    "LastName",
    "Title",
    "Company",
    "Department",
    "AddressOne",
    "AddressTwo",
    "City",
    "State",
    "Zip",
    "PhoneNumber",
    "ExtensionNumber",
    "FAXNumber",
    "PagerNumber",
    "MobilePhoneNumber",
    "CountryCode",
    "EmailAddress",
    "VerifiedFlag",
    "AcceptedFlag",
    "ValidFlag",
    "ResidentialFlag",
    "CustomsIDEIN",
    "ReferenceDescription",
    "ServiceTypeCode",
    "PackageTypeCode",
    "CollectionMethodCode",
    "BillCode",
    "BillAccountNumber",
    "DutyBillCode",
    "DutyBillAccountNumber",
    "CurrencyTypeCode",
    "InsightIDNumber",
    "GroundReferenceDescription",
    "ShipmentNotificationRecipientEmail",
    "RecipientEmailLanguage",
    "RecipientEmailShipmentnotification",
    "RecipientEmailExceptionnotification",
    "RecipientEmailDeliverynotification",
    "PartnerTypeCodes",
    "NetReturnBillAccountNumber",
    "CustomsIDTypeCode",
    "AddressTypeCode",
    "ShipmentNotificationSenderEmail",
    "SenderEmailLanguage",
    "SenderEmailShipmentnotification",
    "SenderEmailExceptionnotification",
    "SenderEmailDeliverynotification",
    "RecipientEmailPickupnotification",
    "SenderEmailPickupnotification",
    "OpCoTypeCd",
    "BrokerAccounttID",
    "BrokerTaxID",
    "DefaultBrokerID",
    "RecipientEmailTenderednotification",
    "SenderEmailTenderednotification",
    "UserAccountNumber",
    "DeliveryInstructions",
    "EstimatedDeliveryFlag",
    "SenderEstimatedDeliveryFlag",
    "ShipmentNotificationSenderDeliveryChannel",
    "ShipmentNotificationSenderMobileNo",
    "ShipmentNotificationSenderMobileNoCountry",
    "ShipmentNotificationSenderMobileNoLanguage",
];

static RULES: Lazy<Vec<ColumnRule>> =
    Lazy::new(|| HEADER_COLUMNS.iter().map(|name| rule_for(name)).collect());

/// The rule sequence for the address-book schema, aligned 1:1 with
/// [`HEADER_COLUMNS`]: rule `i` produces the value for column `i`.
pub fn address_book_rules() -> &'static [ColumnRule] {
    &RULES
}

/// True if `code` selects Germanic digraph expansion.
pub fn is_germanic(code: &str) -> bool {
    let code = code.trim();
    GERMANIC_COUNTRIES
        .iter()
        .any(|c| code.eq_ignore_ascii_case(c))
}

fn rule_for(column: &str) -> ColumnRule {
    match column {
        "Nickname" => ColumnRule::auxiliary(),
        "FullName" => ColumnRule::attribute("contactName"),
        "Company" => ColumnRule::attribute("company"),
        "AddressOne" => ColumnRule::attribute("addressLine1"),
        "AddressTwo" => ColumnRule::attribute("addressLine2"),
        "City" => ColumnRule::attribute("city"),
        "State" => ColumnRule::attribute("state"),
        "Zip" => ColumnRule::attribute("postcode"),
        "PhoneNumber" => ColumnRule::attribute("phoneNumber").digits_only(),
        "CountryCode" => ColumnRule::attribute("country"),
        "EmailAddress" => ColumnRule::attribute("email"),
        "VerifiedFlag" => ColumnRule::attribute_or("verified", "Y"),
        "AcceptedFlag" => ColumnRule::attribute_or("accepted", "N"),
        "ValidFlag" => ColumnRule::attribute_or("valid", "Y"),
        _ => ColumnRule::empty(),
    }
}

/// Position of a column in the header, handy in tests and diagnostics.
pub fn column_index(name: &str) -> Option<usize> {
    HEADER_COLUMNS.iter().position(|c| c.eq_ignore_ascii_case(name))
}
