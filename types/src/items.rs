use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};

use super::{
    read_string, string_encode_size, write_string, EngineError, MAX_CONTAINER_ITEMS,
    MAX_NAME_LENGTH,
};

/// Display rarity of an outcome item. Cosmetic only: selection odds come
/// exclusively from item weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
}

impl Write for Rarity {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Rarity {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Common),
            1 => Ok(Self::Uncommon),
            2 => Ok(Self::Rare),
            3 => Ok(Self::Epic),
            4 => Ok(Self::Legendary),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Rarity {
    const SIZE: usize = 1;
}

/// A prize an opening can land on. `value` is what the winner is
/// credited; `weight` is its share of the container's selection odds,
/// in arbitrary integer units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeItem {
    pub id: u16,
    pub name: String,
    pub value: u64,
    pub weight: u64,
    pub rarity: Rarity,
}

impl Write for OutcomeItem {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        write_string(&self.name, writer);
        self.value.write(writer);
        self.weight.write(writer);
        self.rarity.write(writer);
    }
}

impl Read for OutcomeItem {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: u16::read(reader)?,
            name: read_string(reader, MAX_NAME_LENGTH)?,
            value: u64::read(reader)?,
            weight: u64::read(reader)?,
            rarity: Rarity::read(reader)?,
        })
    }
}

impl EncodeSize for OutcomeItem {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + string_encode_size(&self.name)
            + self.value.encode_size()
            + self.weight.encode_size()
            + self.rarity.encode_size()
    }
}

/// A purchasable pool of weighted outcome items (a "case").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub id: u16,
    pub name: String,
    pub price: u64,
    pub items: Vec<OutcomeItem>,
}

impl Container {
    /// Sum of all item weights. Selection draws land in `[0, total)`.
    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(|i| i.weight).sum()
    }

    /// Reject containers a selection could not be drawn from.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.items.is_empty() {
            return Err(EngineError::Configuration("container has no items"));
        }
        if self.items.len() > MAX_CONTAINER_ITEMS {
            return Err(EngineError::Configuration("container has too many items"));
        }
        if self.price == 0 {
            return Err(EngineError::Configuration("container price is zero"));
        }
        if self.total_weight() == 0 {
            return Err(EngineError::Configuration("container weights sum to zero"));
        }
        Ok(())
    }

    pub fn item(&self, id: u16) -> Option<&OutcomeItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

impl Write for Container {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        write_string(&self.name, writer);
        self.price.write(writer);
        self.items.write(writer);
    }
}

impl Read for Container {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: u16::read(reader)?,
            name: read_string(reader, MAX_NAME_LENGTH)?,
            price: u64::read(reader)?,
            items: Vec::<OutcomeItem>::read_range(reader, 0..=MAX_CONTAINER_ITEMS)?,
        })
    }
}

impl EncodeSize for Container {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + string_encode_size(&self.name)
            + self.price.encode_size()
            + self.items.encode_size()
    }
}
