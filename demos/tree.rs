use rlp_item::{decode, encode, Decoder, Item, Rlp};

/// A block-like record: a header list followed by a list of transactions.
fn block() -> Item {
    let header = Item::list([
        Item::from(&[0x01; 32][..]),
        Item::from([0x2a]),
        Item::from("miner"),
    ]);
    let txs = Item::list([
        Item::list([Item::from([0x00]), Item::from(&b"to"[..]), Item::from(vec![0xde, 0xad])]),
        Item::list([Item::from([0x01]), Item::from(&b"to"[..]), Item::from(vec![0xbe, 0xef])]),
    ]);
    Item::list([header, txs])
}

fn main() -> Result<(), rlp_item::Error> {
    let block = block();
    let out = encode(&block);
    println!("block: {}", hex::encode(&out));
    assert_eq!(decode(&out)?, block);

    // walk the top-level list without building the whole tree at once
    for (i, part) in Rlp::from_list(&out)?.enumerate() {
        println!("part {i}: {:?}", part?);
    }

    let shared = Decoder::new().with_max_depth(3).decode_bytes(out.into())?;
    assert_eq!(shared, block);

    println!("success!");
    Ok(())
}
