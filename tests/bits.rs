use bitport::bits::{bit_read, bit_write, locate, BinaryBytes, Bits};

struct Console(String);
impl ufmt::uWrite for Console {
    type Error = core::convert::Infallible;
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.0.push_str(s);
        Ok(())
    }
}

#[test]
pub fn creation(){
    let tgt:u8 = 0x05;
    let bits = Bits::new(&tgt);
    let test_bool = [true,false,true,false,false,false,false,false];
    assert_eq!(test_bool, bits.bits_boolean().clone());
    assert_eq!(tgt, bits.byte());
    assert_eq!(bits.byte(), Bits::from(tgt).byte());
    assert!(bits.is_set(0));
    assert!(!bits.is_set(1));
    assert!(!bits.is_set(8));
}

#[test]
pub fn set_indices(){
    let bits = Bits::from(0b1000_0010);
    let set: Vec<u8> = bits.set_indices().collect();
    assert_eq!(vec![1, 7], set);
    assert_eq!(0, Bits::default().set_indices().count());
}

#[test]
pub fn locate_splits_byte_and_bit(){
    assert_eq!((0, 0), locate(0));
    assert_eq!((0, 7), locate(7));
    assert_eq!((1, 0), locate(8));
    assert_eq!((2, 3), locate(19));
}

#[test]
pub fn two_chip_boundary(){
    let data = [0b0000_0001u8, 0b0000_0000];
    assert_eq!(Some(true), bit_read(&data, 0));
    for position in 1..16{
        assert_eq!(Some(false), bit_read(&data, position), "pin {}", position);
    }
    assert_eq!(None, bit_read(&data, 16));
}

#[test]
pub fn write_leaves_neighbours(){
    let mut data = [0b1010_1010u8, 0b0101_0101];
    bit_write(&mut data, 8, false).unwrap();
    bit_write(&mut data, 0, true).unwrap();
    assert_eq!([0b1010_1011, 0b0101_0100], data);
    assert_eq!(None, bit_write(&mut data, 16, true));
    assert_eq!([0b1010_1011, 0b0101_0100], data);
}

#[test]
pub fn binary_dump(){
    let mut console = Console(String::new());
    ufmt::uwrite!(&mut console, "Inputs: {}", BinaryBytes(&[0b0000_0101, 0x80])).unwrap();
    assert_eq!("Inputs: 00000101 10000000", console.0);
}
