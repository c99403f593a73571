//! Request origin metadata and the point-of-presence lookup table.
//!
//! The network layer tags each inbound request with the IATA code of the
//! point of presence that received it (e.g. `"LAX"`). That code is the only
//! topology input the resolver uses.

use super::Region;

/// Source of a request's physical origin.
pub trait OriginHint {
    /// Point-of-presence code, if the network layer supplied one.
    fn origin_code(&self) -> Option<&str>;
}

/// Origin metadata attached to an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    /// IATA code of the receiving point of presence.
    pub colo: Option<String>,
}

impl RequestOrigin {
    /// Origin received at `colo`.
    pub fn from_colo(colo: impl Into<String>) -> Self {
        Self {
            colo: Some(colo.into()),
        }
    }

    /// Request without origin metadata.
    pub fn unknown() -> Self {
        Self::default()
    }
}

impl OriginHint for RequestOrigin {
    fn origin_code(&self) -> Option<&str> {
        self.colo.as_deref()
    }
}

impl OriginHint for str {
    fn origin_code(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: OriginHint> OriginHint for Option<T> {
    fn origin_code(&self) -> Option<&str> {
        self.as_ref().and_then(|hint| hint.origin_code())
    }
}

impl<T: OriginHint + ?Sized> OriginHint for &T {
    fn origin_code(&self) -> Option<&str> {
        (**self).origin_code()
    }
}

/// Point-of-presence code to macro-region, sorted by code.
static POP_REGIONS: &[(&str, Region)] = &[
    ("ABQ", Region::Wnam),
    ("ACC", Region::Afr),
    ("ADL", Region::Oc),
    ("AKL", Region::Oc),
    ("ALG", Region::Afr),
    ("AMM", Region::Me),
    ("AMS", Region::Weur),
    ("ANC", Region::Wnam),
    ("ARN", Region::Weur),
    ("ASU", Region::Sam),
    ("ATH", Region::Eeur),
    ("ATL", Region::Enam),
    ("AUH", Region::Me),
    ("BAH", Region::Me),
    ("BCN", Region::Weur),
    ("BEG", Region::Eeur),
    ("BEY", Region::Me),
    ("BGW", Region::Me),
    ("BKK", Region::Apac),
    ("BLR", Region::Apac),
    ("BNA", Region::Enam),
    ("BNE", Region::Oc),
    ("BOG", Region::Sam),
    ("BOI", Region::Wnam),
    ("BOM", Region::Apac),
    ("BOS", Region::Enam),
    ("BRU", Region::Weur),
    ("BUD", Region::Eeur),
    ("CAI", Region::Afr),
    ("CAN", Region::Apac),
    ("CCU", Region::Apac),
    ("CDG", Region::Weur),
    ("CGK", Region::Apac),
    ("CHC", Region::Oc),
    ("CLT", Region::Enam),
    ("CMB", Region::Apac),
    ("CMH", Region::Enam),
    ("CMN", Region::Afr),
    ("CPH", Region::Weur),
    ("CPT", Region::Afr),
    ("CTU", Region::Apac),
    ("CWB", Region::Sam),
    ("DAC", Region::Apac),
    ("DAR", Region::Afr),
    ("DEL", Region::Apac),
    ("DEN", Region::Wnam),
    ("DFW", Region::Enam),
    ("DME", Region::Eeur),
    ("DOH", Region::Me),
    ("DTW", Region::Enam),
    ("DUB", Region::Weur),
    ("DUS", Region::Weur),
    ("DXB", Region::Me),
    ("EDI", Region::Weur),
    ("EWR", Region::Enam),
    ("EZE", Region::Sam),
    ("FCO", Region::Weur),
    ("FOR", Region::Sam),
    ("FRA", Region::Weur),
    ("GIG", Region::Sam),
    ("GRU", Region::Sam),
    ("GVA", Region::Weur),
    ("HAM", Region::Weur),
    ("HAN", Region::Apac),
    ("HEL", Region::Eeur),
    ("HKG", Region::Apac),
    ("HND", Region::Apac),
    ("HNL", Region::Wnam),
    ("HYD", Region::Apac),
    ("IAD", Region::Enam),
    ("IAH", Region::Enam),
    ("ICN", Region::Apac),
    ("IND", Region::Enam),
    ("ISB", Region::Apac),
    ("IST", Region::Eeur),
    ("JAX", Region::Enam),
    ("JED", Region::Me),
    ("JFK", Region::Enam),
    ("JNB", Region::Afr),
    ("KBP", Region::Eeur),
    ("KGL", Region::Afr),
    ("KHI", Region::Apac),
    ("KIX", Region::Apac),
    ("KUL", Region::Apac),
    ("KWI", Region::Me),
    ("LAS", Region::Wnam),
    ("LAX", Region::Wnam),
    ("LED", Region::Eeur),
    ("LHR", Region::Weur),
    ("LIM", Region::Sam),
    ("LIS", Region::Weur),
    ("LOS", Region::Afr),
    ("LUX", Region::Weur),
    ("MAA", Region::Apac),
    ("MAD", Region::Weur),
    ("MAN", Region::Weur),
    ("MBA", Region::Afr),
    ("MCI", Region::Enam),
    ("MCT", Region::Me),
    ("MDE", Region::Sam),
    ("MEL", Region::Oc),
    ("MEM", Region::Enam),
    ("MIA", Region::Enam),
    ("MNL", Region::Apac),
    ("MRS", Region::Weur),
    ("MSP", Region::Enam),
    ("MUC", Region::Weur),
    ("MVD", Region::Sam),
    ("MXP", Region::Weur),
    ("NBO", Region::Afr),
    ("NOU", Region::Oc),
    ("NRT", Region::Apac),
    ("OAK", Region::Wnam),
    ("ORD", Region::Enam),
    ("OSL", Region::Weur),
    ("OTP", Region::Eeur),
    ("PDX", Region::Wnam),
    ("PEK", Region::Apac),
    ("PER", Region::Oc),
    ("PHL", Region::Enam),
    ("PHX", Region::Wnam),
    ("PIT", Region::Enam),
    ("POA", Region::Sam),
    ("PRG", Region::Eeur),
    ("PVG", Region::Apac),
    ("RDU", Region::Enam),
    ("RIX", Region::Eeur),
    ("RUH", Region::Me),
    ("SAN", Region::Wnam),
    ("SCL", Region::Sam),
    ("SEA", Region::Wnam),
    ("SFO", Region::Wnam),
    ("SGN", Region::Apac),
    ("SIN", Region::Apac),
    ("SJC", Region::Wnam),
    ("SLC", Region::Wnam),
    ("SMF", Region::Wnam),
    ("SOF", Region::Eeur),
    ("STL", Region::Enam),
    ("SYD", Region::Oc),
    ("TLL", Region::Eeur),
    ("TLV", Region::Me),
    ("TPA", Region::Enam),
    ("TPE", Region::Apac),
    ("UIO", Region::Sam),
    ("VIE", Region::Weur),
    ("VNO", Region::Eeur),
    ("WAW", Region::Eeur),
    ("WLG", Region::Oc),
    ("YUL", Region::Enam),
    ("YVR", Region::Wnam),
    ("YYZ", Region::Enam),
    ("ZAG", Region::Eeur),
    ("ZRH", Region::Weur),
];

/// Region containing the point of presence `code`, case-insensitive.
pub fn region_for_code(code: &str) -> Option<Region> {
    let code = code.trim().to_ascii_uppercase();
    POP_REGIONS
        .binary_search_by(|(pop, _)| (*pop).cmp(code.as_str()))
        .ok()
        .map(|index| POP_REGIONS[index].1)
}
