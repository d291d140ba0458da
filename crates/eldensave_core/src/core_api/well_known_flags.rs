//! Built-in event-flag name table covering the flag IDs the editor surfaces
//! by default. IDs and names come from the community flag database; this is
//! only the documented subset. Every other ID is still addressable, it just
//! has no display name.

pub(crate) struct WellKnownFlag {
    pub id: u64,
    pub category: &'static str,
    pub subcategory: &'static str,
    pub name: &'static str,
}

// Flag IDs referenced by the stock editor views, with their community names.
#[rustfmt::skip]
pub(crate) const WELL_KNOWN_FLAGS: &[WellKnownFlag] = &[
    // Tutorial / opening
    WellKnownFlag { id:    20, category: "Progression", subcategory: "Opening",      name: "Left the Chapel of Anticipation" },
    WellKnownFlag { id:    60, category: "Progression", subcategory: "Opening",      name: "Reached Limgrave" },

    // Sites of grace
    WellKnownFlag { id: 71000, category: "Graces", subcategory: "Limgrave",          name: "The First Step" },
    WellKnownFlag { id: 71001, category: "Graces", subcategory: "Limgrave",          name: "Church of Elleh" },
    WellKnownFlag { id: 71002, category: "Graces", subcategory: "Limgrave",          name: "Gatefront" },
    WellKnownFlag { id: 71019, category: "Graces", subcategory: "Limgrave",          name: "Agheel Lake South" },
    WellKnownFlag { id: 71190, category: "Graces", subcategory: "Roundtable",        name: "Table of Lost Grace" },
    WellKnownFlag { id: 71210, category: "Graces", subcategory: "Liurnia",           name: "Lake-Facing Cliffs" },
    WellKnownFlag { id: 71240, category: "Graces", subcategory: "Liurnia",           name: "Raya Lucaria Grand Library" },
    WellKnownFlag { id: 71300, category: "Graces", subcategory: "Caelid",            name: "Smoldering Church" },
    WellKnownFlag { id: 71340, category: "Graces", subcategory: "Altus Plateau",     name: "Altus Highway Junction" },
    WellKnownFlag { id: 71400, category: "Graces", subcategory: "Leyndell",          name: "East Capital Rampart" },
    WellKnownFlag { id: 71520, category: "Graces", subcategory: "Mountaintops",      name: "Zamor Ruins" },
    WellKnownFlag { id: 71610, category: "Graces", subcategory: "Farum Azula",       name: "Crumbling Beast Grave" },

    // Boss defeats
    WellKnownFlag { id:  9100, category: "Bosses", subcategory: "Limgrave",          name: "Margit, the Fell Omen" },
    WellKnownFlag { id:  9101, category: "Bosses", subcategory: "Stormveil",         name: "Godrick the Grafted" },
    WellKnownFlag { id:  9104, category: "Bosses", subcategory: "Raya Lucaria",      name: "Rennala, Queen of the Full Moon" },
    WellKnownFlag { id:  9107, category: "Bosses", subcategory: "Caelid",            name: "Starscourge Radahn" },
    WellKnownFlag { id:  9118, category: "Bosses", subcategory: "Mt. Gelmir",        name: "Rykard, Lord of Blasphemy" },
    WellKnownFlag { id:  9120, category: "Bosses", subcategory: "Leyndell",          name: "Morgott, the Omen King" },
    WellKnownFlag { id:  9122, category: "Bosses", subcategory: "Mountaintops",      name: "Fire Giant" },
    WellKnownFlag { id:  9125, category: "Bosses", subcategory: "Farum Azula",       name: "Maliketh, the Black Blade" },
    WellKnownFlag { id:  9130, category: "Bosses", subcategory: "Leyndell",          name: "Godfrey, First Elden Lord" },
    WellKnownFlag { id:  9131, category: "Bosses", subcategory: "Erdtree",           name: "Radagon of the Golden Order" },
    WellKnownFlag { id:  9135, category: "Bosses", subcategory: "Haligtree",         name: "Malenia, Blade of Miquella" },
    WellKnownFlag { id:  9140, category: "Bosses", subcategory: "Siofra",            name: "Ancestor Spirit" },
    WellKnownFlag { id:  9145, category: "Bosses", subcategory: "Deeproot",          name: "Fortissax, the Lichdragon" },

    // Great runes
    WellKnownFlag { id: 60100, category: "Progression", subcategory: "Great Runes",  name: "Godrick's Great Rune restored" },
    WellKnownFlag { id: 60110, category: "Progression", subcategory: "Great Runes",  name: "Radahn's Great Rune restored" },
    WellKnownFlag { id: 60120, category: "Progression", subcategory: "Great Runes",  name: "Rykard's Great Rune restored" },
    WellKnownFlag { id: 60130, category: "Progression", subcategory: "Great Runes",  name: "Morgott's Great Rune restored" },
    WellKnownFlag { id: 60140, category: "Progression", subcategory: "Great Runes",  name: "Mohg's Great Rune restored" },
    WellKnownFlag { id: 60150, category: "Progression", subcategory: "Great Runes",  name: "Malenia's Great Rune restored" },

    // Whetblades
    WellKnownFlag { id: 65600, category: "Whetblades", subcategory: "",              name: "Whetstone Knife" },
    WellKnownFlag { id: 65610, category: "Whetblades", subcategory: "",              name: "Iron Whetblade" },
    WellKnownFlag { id: 65620, category: "Whetblades", subcategory: "",              name: "Red-Hot Whetblade" },
    WellKnownFlag { id: 65630, category: "Whetblades", subcategory: "",              name: "Sanctified Whetblade" },
    WellKnownFlag { id: 65640, category: "Whetblades", subcategory: "",              name: "Glintstone Whetblade" },
    WellKnownFlag { id: 65650, category: "Whetblades", subcategory: "",              name: "Black Whetblade" },

    // Merchants / bell bearings
    WellKnownFlag { id: 66100, category: "Merchants", subcategory: "Bell Bearings",  name: "Bone Peddler's Bell Bearing given" },
    WellKnownFlag { id: 66110, category: "Merchants", subcategory: "Bell Bearings",  name: "Meat Peddler's Bell Bearing given" },
    WellKnownFlag { id: 66130, category: "Merchants", subcategory: "Bell Bearings",  name: "Gravity Stone Peddler's Bell Bearing given" },

    // NPC questlines
    WellKnownFlag { id: 40010, category: "NPCs", subcategory: "Ranni",               name: "Met Ranni at Church of Elleh" },
    WellKnownFlag { id: 40025, category: "NPCs", subcategory: "Ranni",               name: "Received the Dark Moon Ring" },
    WellKnownFlag { id: 40300, category: "NPCs", subcategory: "Melina",              name: "Accepted Melina's accord" },
    WellKnownFlag { id: 40410, category: "NPCs", subcategory: "Alexander",           name: "Freed Alexander near the Gatefront" },
    WellKnownFlag { id: 40620, category: "NPCs", subcategory: "Millicent",           name: "Gave Millicent the Unalloyed Gold Needle" },
];
