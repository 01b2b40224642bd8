use nalgebra::Vector2;
use paddock_derive::RecordType;
use rand::prelude::Distribution;

#[derive(
    RecordType, Default, Copy, Clone, PartialEq, Debug, bytemuck::AnyBitPattern, bytemuck::NoUninit,
)]
#[repr(C, packed)]
pub(crate) struct CustomRecordSmall {
    #[paddock(BUILTIN_COORD_2D)]
    pub coord: Vector2<f64>,
    #[paddock(BUILTIN_CATEGORY)]
    pub category: u8,
}

#[derive(
    RecordType, Default, Copy, Clone, PartialEq, Debug, bytemuck::AnyBitPattern, bytemuck::NoUninit,
)]
#[repr(C, packed)]
pub(crate) struct CustomRecordBig {
    #[paddock(BUILTIN_SAMPLE_ID)]
    pub sample_id: u64,
    #[paddock(BUILTIN_COORD_2D)]
    pub coord: Vector2<f64>,
    #[paddock(BUILTIN_WEIGHT)]
    pub weight: f32,
    #[paddock(field = "Flags")]
    pub flags: u16,
    #[paddock(BUILTIN_CATEGORY)]
    pub category: u8,
}

pub(crate) struct DefaultRecordDistribution;

impl Distribution<CustomRecordSmall> for DefaultRecordDistribution {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> CustomRecordSmall {
        CustomRecordSmall {
            coord: Vector2::new(rng.gen(), rng.gen()),
            category: rng.gen(),
        }
    }
}

impl Distribution<CustomRecordBig> for DefaultRecordDistribution {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> CustomRecordBig {
        CustomRecordBig {
            sample_id: rng.gen(),
            coord: Vector2::new(rng.gen(), rng.gen()),
            weight: rng.gen(),
            flags: rng.gen(),
            category: rng.gen(),
        }
    }
}
