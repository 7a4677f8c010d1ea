// Room catalog: the fixed set of room types a guest can book.
// Entries are compiled into the binary and never change at runtime.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoomFacility {
    #[serde(rename = "Free Wi-Fi")]
    FreeWifi,
    #[serde(rename = "Flat-screen TV")]
    FlatScreenTv,
    #[serde(rename = "Air conditioning")]
    AirConditioning,
    #[serde(rename = "Mini bar")]
    MiniBar,
    #[serde(rename = "Coffee machine")]
    CoffeeMachine,
    #[serde(rename = "Bathtub")]
    Bathtub,
    #[serde(rename = "Safe")]
    Safe,
    #[serde(rename = "Hairdryer")]
    Hairdryer,
    #[serde(rename = "Walk-in shower")]
    WalkInShower,
    #[serde(rename = "Bathrobe & slippers")]
    BathrobeAndSlippers,
    #[serde(rename = "Workspace")]
    Workspace,
    #[serde(rename = "Separate living area")]
    SeparateLivingArea,
    #[serde(rename = "Dining area")]
    DiningArea,
    #[serde(rename = "Jacuzzi")]
    Jacuzzi,
    #[serde(rename = "Butler service")]
    ButlerService,
    #[serde(rename = "Private lounge access")]
    PrivateLoungeAccess,
    #[serde(rename = "Private balcony")]
    PrivateBalcony,
    #[serde(rename = "Kitchen")]
    Kitchen,
    #[serde(rename = "Champagne service")]
    ChampagneService,
}

impl RoomFacility {
    pub fn label(&self) -> &'static str {
        match self {
            RoomFacility::FreeWifi => "Free Wi-Fi",
            RoomFacility::FlatScreenTv => "Flat-screen TV",
            RoomFacility::AirConditioning => "Air conditioning",
            RoomFacility::MiniBar => "Mini bar",
            RoomFacility::CoffeeMachine => "Coffee machine",
            RoomFacility::Bathtub => "Bathtub",
            RoomFacility::Safe => "Safe",
            RoomFacility::Hairdryer => "Hairdryer",
            RoomFacility::WalkInShower => "Walk-in shower",
            RoomFacility::BathrobeAndSlippers => "Bathrobe & slippers",
            RoomFacility::Workspace => "Workspace",
            RoomFacility::SeparateLivingArea => "Separate living area",
            RoomFacility::DiningArea => "Dining area",
            RoomFacility::Jacuzzi => "Jacuzzi",
            RoomFacility::ButlerService => "Butler service",
            RoomFacility::PrivateLoungeAccess => "Private lounge access",
            RoomFacility::PrivateBalcony => "Private balcony",
            RoomFacility::Kitchen => "Kitchen",
            RoomFacility::ChampagneService => "Champagne service",
        }
    }
}

impl fmt::Display for RoomFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub room_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub bed_type: &'static str,
    #[serde(rename = "size")]
    pub size_label: &'static str,
    pub max_occupancy: u32,
    pub price_per_night: f64,
    pub facilities: &'static [RoomFacility],
    pub images: &'static [&'static str],
}

use RoomFacility::*;

static ROOMS: [Room; 6] = [
    Room {
        id: "standard-twin",
        room_type: "standard-twin",
        name: "Standard Twin Room",
        description: "Comfortable and cozy twin room perfect for friends or colleagues traveling together.",
        bed_type: "2 Single Beds",
        size_label: "25 sq.m",
        max_occupancy: 2,
        price_per_night: 180.0,
        facilities: &[FreeWifi, FlatScreenTv, AirConditioning, MiniBar, Hairdryer, Safe],
        images: &[
            "https://images.unsplash.com/photo-1566665797739-1674de7a421a?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
            "https://images.unsplash.com/photo-1522771739844-6a9f6d5f14af?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ],
    },
    Room {
        id: "executive-twin",
        room_type: "executive-twin",
        name: "Executive Twin Room",
        description: "Upgraded twin room with enhanced amenities and executive privileges.",
        bed_type: "2 Single Beds",
        size_label: "30 sq.m",
        max_occupancy: 2,
        price_per_night: 220.0,
        facilities: &[
            FreeWifi,
            FlatScreenTv,
            AirConditioning,
            MiniBar,
            CoffeeMachine,
            Hairdryer,
            Safe,
            BathrobeAndSlippers,
            PrivateLoungeAccess,
        ],
        images: &[
            "https://images.unsplash.com/photo-1590490360182-c33d57733427?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
            "https://images.unsplash.com/photo-1587985064135-0366536eab42?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ],
    },
    Room {
        id: "superior-suite",
        room_type: "superior-suite",
        name: "Superior Suite",
        description: "Spacious suite with a separate living area and premium amenities for comfort.",
        bed_type: "1 King Bed",
        size_label: "45 sq.m",
        max_occupancy: 3,
        price_per_night: 320.0,
        facilities: &[
            FreeWifi,
            FlatScreenTv,
            AirConditioning,
            MiniBar,
            CoffeeMachine,
            Bathtub,
            WalkInShower,
            Safe,
            Hairdryer,
            BathrobeAndSlippers,
            Workspace,
            SeparateLivingArea,
        ],
        images: &[
            "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
            "https://images.unsplash.com/photo-1578683010236-d716f9a3f461?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ],
    },
    Room {
        id: "deluxe-suite",
        room_type: "deluxe-suite",
        name: "Deluxe Suite",
        description: "Indulgent suite offering enhanced space and luxury amenities for a premium stay experience.",
        bed_type: "1 King Bed",
        size_label: "55 sq.m",
        max_occupancy: 3,
        price_per_night: 420.0,
        facilities: &[
            FreeWifi,
            FlatScreenTv,
            AirConditioning,
            MiniBar,
            CoffeeMachine,
            Bathtub,
            WalkInShower,
            Safe,
            Hairdryer,
            BathrobeAndSlippers,
            Workspace,
            SeparateLivingArea,
            PrivateBalcony,
            Jacuzzi,
        ],
        images: &[
            "https://images.unsplash.com/photo-1631049307264-da0ec9d70304?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
            "https://images.unsplash.com/photo-1621293954908-907159247fc8?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ],
    },
    Room {
        id: "executive-suite",
        room_type: "executive-suite",
        name: "Executive Suite",
        description: "Premium suite with executive benefits, featuring elegant decor and top-tier amenities.",
        bed_type: "1 King Bed",
        size_label: "65 sq.m",
        max_occupancy: 3,
        price_per_night: 520.0,
        facilities: &[
            FreeWifi,
            FlatScreenTv,
            AirConditioning,
            MiniBar,
            CoffeeMachine,
            Bathtub,
            WalkInShower,
            Safe,
            Hairdryer,
            BathrobeAndSlippers,
            Workspace,
            SeparateLivingArea,
            PrivateBalcony,
            Jacuzzi,
            PrivateLoungeAccess,
            ButlerService,
        ],
        images: &[
            "https://images.unsplash.com/photo-1611892440504-42a792e24d32?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
            "https://images.unsplash.com/photo-1591088398332-8a7791972843?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ],
    },
    Room {
        id: "presidential-suite",
        room_type: "presidential-suite",
        name: "Presidential Suite",
        description: "The ultimate luxury experience with expansive space, unparalleled amenities, and personalized service.",
        bed_type: "1 King Bed and 2 Queen Beds",
        size_label: "120 sq.m",
        max_occupancy: 5,
        price_per_night: 1200.0,
        facilities: &[
            FreeWifi,
            FlatScreenTv,
            AirConditioning,
            MiniBar,
            CoffeeMachine,
            Bathtub,
            WalkInShower,
            Safe,
            Hairdryer,
            BathrobeAndSlippers,
            Workspace,
            SeparateLivingArea,
            DiningArea,
            Jacuzzi,
            ButlerService,
            PrivateBalcony,
            Kitchen,
            PrivateLoungeAccess,
            ChampagneService,
        ],
        images: &[
            "https://images.unsplash.com/photo-1416331108676-a22ccb276e35?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
            "https://images.unsplash.com/photo-1596394516093-501ba68a0ba6?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
        ],
    },
];

// Read-only view over a set of rooms.
// The catalog hands out shared references only; there is no way to add,
// remove or edit a room through it.
#[derive(Debug, Clone, Copy)]
pub struct RoomCatalog {
    rooms: &'static [Room],
}

impl RoomCatalog {
    // The process-wide catalog shipped with the hotel.
    pub fn standard() -> Self {
        Self { rooms: &ROOMS }
    }

    // Wrap another static room list, e.g. a catalog for a different property.
    pub const fn from_static(rooms: &'static [Room]) -> Self {
        Self { rooms }
    }

    pub fn rooms(&self) -> impl Iterator<Item = &'static Room> {
        self.rooms.iter()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    // Exact match on the room type key. Unknown types return `None`.
    pub fn lookup_by_type(&self, room_type: &str) -> Option<&'static Room> {
        self.rooms.iter().find(|room| room.room_type == room_type)
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

// Maximum guests allowed for `room_type`, or `None` when the type is not in the catalog.
// Called at every point a booking draft changes so the bound always reflects
// the room currently selected.
pub fn derive_max_guests(room_type: &str, catalog: &RoomCatalog) -> Option<u32> {
    catalog
        .lookup_by_type(room_type)
        .map(|room| room.max_occupancy)
}
