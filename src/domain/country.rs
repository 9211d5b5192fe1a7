//! Static reference table of supported countries, their regions and area codes.

/// How a free-form region name is turned into the `InRegion` search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPolicy {
    /// Region names are the canonical key: match case-insensitively, send the name.
    ExactName,
    /// Exact key lookup, then case-insensitive; send the region code.
    CodedWithFallback,
    /// Exact key lookup only; send the region code when found.
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub code: &'static str,
    pub area_codes: &'static [u16],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub region_policy: RegionPolicy,
    /// Area codes are meaningful for search filters and region labels are
    /// resolved from the provider's region code.
    pub area_code_aware: bool,
    pub regions: &'static [Region],
}

impl Country {
    /// Region whose name equals `name` exactly.
    pub fn region(&self, name: &str) -> Option<&'static Region> {
        self.regions.iter().find(|region| region.name == name)
    }

    /// Region whose name equals `name` ignoring case.
    pub fn region_ignore_case(&self, name: &str) -> Option<&'static Region> {
        let wanted = name.to_lowercase();
        self.regions
            .iter()
            .find(|region| region.name.to_lowercase() == wanted)
    }

    /// Reverse lookup: region whose stored code equals `code`.
    pub fn region_by_code(&self, code: &str) -> Option<&'static Region> {
        self.regions.iter().find(|region| region.code == code)
    }

    /// Whether `area_code` appears in any region of this country.
    pub fn has_area_code(&self, area_code: u16) -> bool {
        self.regions
            .iter()
            .flat_map(|region| region.area_codes.iter())
            .any(|code| *code == area_code)
    }
}

/// Look up a supported country by ISO code (case-sensitive, upper-case).
pub fn country(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|country| country.code == code)
}

/// All countries known to the reference table.
pub fn countries() -> &'static [Country] {
    COUNTRIES
}

static COUNTRIES: &[Country] = &[
    Country {
        code: "US",
        name: "United States",
        region_policy: RegionPolicy::CodedWithFallback,
        area_code_aware: true,
        regions: US_REGIONS,
    },
    Country {
        code: "CA",
        name: "Canada",
        region_policy: RegionPolicy::Direct,
        area_code_aware: true,
        regions: CA_REGIONS,
    },
    Country {
        code: "GB",
        name: "United Kingdom",
        region_policy: RegionPolicy::ExactName,
        area_code_aware: false,
        regions: GB_REGIONS,
    },
    Country {
        code: "AU",
        name: "Australia",
        region_policy: RegionPolicy::Direct,
        area_code_aware: false,
        regions: AU_REGIONS,
    },
];

const fn region(name: &'static str, code: &'static str, area_codes: &'static [u16]) -> Region {
    Region {
        name,
        code,
        area_codes,
    }
}

static US_REGIONS: &[Region] = &[
    region("Alabama", "AL", &[205, 251, 256, 334, 659, 938]),
    region("Alaska", "AK", &[907]),
    region("Arizona", "AZ", &[480, 520, 602, 623, 928]),
    region("Arkansas", "AR", &[327, 479, 501, 870]),
    region(
        "California",
        "CA",
        &[
            209, 213, 279, 310, 323, 341, 350, 408, 415, 424, 442, 510, 530, 559, 562, 619, 626,
            628, 650, 657, 661, 669, 707, 714, 747, 760, 805, 818, 820, 831, 840, 858, 909, 916,
            925, 949, 951,
        ],
    ),
    region("Colorado", "CO", &[303, 719, 720, 970, 983]),
    region("Connecticut", "CT", &[203, 475, 860, 959]),
    region("Delaware", "DE", &[302]),
    region("District of Columbia", "DC", &[202, 771]),
    region(
        "Florida",
        "FL",
        &[
            239, 305, 321, 324, 352, 386, 407, 448, 561, 645, 656, 689, 727, 728, 754, 772, 786,
            813, 850, 863, 904, 941, 954,
        ],
    ),
    region(
        "Georgia",
        "GA",
        &[229, 404, 470, 478, 678, 706, 762, 770, 912, 943],
    ),
    region("Hawaii", "HI", &[808]),
    region("Idaho", "ID", &[208, 986]),
    region(
        "Illinois",
        "IL",
        &[
            217, 224, 309, 312, 331, 447, 464, 618, 630, 708, 730, 773, 779, 815, 847, 861, 872,
        ],
    ),
    region("Indiana", "IN", &[219, 260, 317, 463, 574, 765, 812, 930]),
    region("Iowa", "IA", &[319, 515, 563, 641, 712]),
    region("Kansas", "KS", &[316, 620, 785, 913]),
    region("Kentucky", "KY", &[270, 364, 502, 606, 859]),
    region("Louisiana", "LA", &[225, 318, 337, 504, 985]),
    region("Maine", "ME", &[207]),
    region("Maryland", "MD", &[227, 240, 301, 410, 443, 667]),
    region(
        "Massachusetts",
        "MA",
        &[339, 351, 413, 508, 617, 774, 781, 857, 978],
    ),
    region(
        "Michigan",
        "MI",
        &[
            231, 248, 269, 313, 517, 586, 616, 679, 734, 810, 906, 947, 989,
        ],
    ),
    region("Minnesota", "MN", &[218, 320, 507, 612, 651, 763, 924, 952]),
    region("Mississippi", "MS", &[228, 601, 662, 769]),
    region("Missouri", "MO", &[314, 417, 557, 573, 636, 660, 816, 975]),
    region("Montana", "MT", &[406]),
    region("Nebraska", "NE", &[308, 402, 531]),
    region("Nevada", "NV", &[702, 725, 775]),
    region("New Hampshire", "NH", &[603]),
    region(
        "New Jersey",
        "NJ",
        &[201, 551, 609, 640, 732, 848, 856, 862, 908, 973],
    ),
    region("New Mexico", "NM", &[505, 575]),
    region(
        "New York",
        "NY",
        &[
            212, 315, 329, 332, 347, 363, 516, 518, 585, 607, 624, 631, 646, 680, 716, 718, 838,
            845, 914, 917, 929, 934,
        ],
    ),
    region(
        "North Carolina",
        "NC",
        &[252, 336, 472, 704, 743, 828, 910, 919, 980, 984],
    ),
    region("North Dakota", "ND", &[701]),
    region(
        "Ohio",
        "OH",
        &[
            216, 220, 234, 283, 326, 330, 380, 419, 436, 440, 513, 567, 614, 740, 937,
        ],
    ),
    region("Oklahoma", "OK", &[405, 539, 572, 580, 918]),
    region("Oregon", "OR", &[458, 503, 541, 971]),
    region(
        "Pennsylvania",
        "PA",
        &[
            215, 223, 267, 272, 412, 445, 484, 570, 582, 610, 717, 724, 814, 835, 878,
        ],
    ),
    region("Rhode Island", "RI", &[401]),
    region("South Carolina", "SC", &[803, 821, 839, 843, 854, 864]),
    region("South Dakota", "SD", &[605]),
    region("Tennessee", "TN", &[423, 615, 629, 731, 865, 901, 931]),
    region(
        "Texas",
        "TX",
        &[
            210, 214, 254, 281, 325, 346, 361, 409, 430, 432, 469, 512, 682, 713, 726, 737, 806,
            817, 830, 832, 903, 915, 936, 940, 945, 956, 972, 979,
        ],
    ),
    region("Utah", "UT", &[385, 435, 801]),
    region("Vermont", "VT", &[802]),
    region(
        "Virginia",
        "VA",
        &[276, 434, 540, 571, 686, 703, 757, 804, 826, 948],
    ),
    region("Washington", "WA", &[206, 253, 360, 425, 509, 564]),
    region("West Virginia", "WV", &[304, 681]),
    region("Wisconsin", "WI", &[262, 274, 353, 414, 534, 608, 715, 920]),
    region("Wyoming", "WY", &[307]),
];

static CA_REGIONS: &[Region] = &[
    region("Alberta", "AB", &[368, 403, 587, 780, 825]),
    region("British Columbia", "BC", &[236, 250, 257, 604, 672, 778]),
    region("Manitoba", "MB", &[204, 431, 584]),
    region("New Brunswick", "NB", &[428, 506]),
    region("Newfoundland and Labrador", "NL", &[709, 879]),
    region("Northwest Territories", "NT", &[867]),
    region("Nova Scotia", "NS", &[782, 902]),
    region("Nunavut", "NU", &[867]),
    region(
        "Ontario",
        "ON",
        &[
            226, 249, 289, 343, 365, 382, 416, 437, 519, 548, 613, 647, 683, 705, 742, 753, 807,
            905, 942,
        ],
    ),
    region("Prince Edward Island", "PE", &[782, 902]),
    region(
        "Quebec",
        "QC",
        &[263, 354, 367, 418, 438, 450, 468, 514, 579, 581, 819, 873],
    ),
    region("Saskatchewan", "SK", &[306, 474, 639]),
    region("Yukon", "YT", &[867]),
];

static GB_REGIONS: &[Region] = &[
    region("England", "ENG", &[]),
    region("Northern Ireland", "NIR", &[]),
    region("Scotland", "SCT", &[]),
    region("Wales", "WLS", &[]),
];

static AU_REGIONS: &[Region] = &[
    region("Australian Capital Territory", "ACT", &[]),
    region("New South Wales", "NSW", &[]),
    region("Northern Territory", "NT", &[]),
    region("Queensland", "QLD", &[]),
    region("South Australia", "SA", &[]),
    region("Tasmania", "TAS", &[]),
    region("Victoria", "VIC", &[]),
    region("Western Australia", "WA", &[]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_country_code_resolves() {
        for entry in countries() {
            assert_eq!(country(entry.code), Some(entry));
        }
        assert_eq!(country("FR"), None);
    }

    #[test]
    fn region_codes_are_unique_per_country() {
        for entry in countries() {
            let mut codes = entry.regions.iter().map(|r| r.code).collect::<Vec<_>>();
            codes.sort_unstable();
            let before = codes.len();
            codes.dedup();
            assert_eq!(
                before,
                codes.len(),
                "duplicate region code in {}",
                entry.code
            );
        }
    }

    #[test]
    fn lookups_cover_name_case_and_code() {
        let us = country("US").unwrap();
        assert_eq!(us.region("California").map(|r| r.code), Some("CA"));
        assert_eq!(us.region("california"), None);
        assert_eq!(
            us.region_ignore_case("cALifornia").map(|r| r.name),
            Some("California")
        );
        assert_eq!(us.region_by_code("TX").map(|r| r.name), Some("Texas"));
        assert_eq!(us.region_by_code("ZZ"), None);
    }

    #[test]
    fn area_codes_are_searched_across_all_regions() {
        let us = country("US").unwrap();
        assert!(us.has_area_code(415));
        assert!(us.has_area_code(907));
        assert!(!us.has_area_code(999));

        let ca = country("CA").unwrap();
        assert!(ca.has_area_code(416));
        assert!(!ca.has_area_code(415));
    }
}
