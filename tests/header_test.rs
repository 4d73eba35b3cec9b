use hex_literal::hex;
use pgdump_header::{ArchiveFormat, Compression, Header, HeaderError};
use serde_json::Value;

const MIN_DUMP: [u8; 89] = hex!(
    "50 47 44 4d 50" // PGDMP
    "01 0d 00" // major, minor, patch version
    "04" // integer size
    "08" // offset size
    "01" // format
    "01 01 00 00 00" // Compression level
    "00 21 00 00 00" // Seconds
    "00 35 00 00 00" // Minutes
    "00 12 00 00 00" // Hours
    "00 03 00 00 00" // Days
    "00 06 00 00 00" // Months
    "00 79 00 00 00" // Years (since 1900)
    "00 01 00 00 00" // is DST
    "00 08 00 00 00 65 6d 70 74 79 5f 64 62" // database name
    "00 05 00 00 00 31 30 2e 31 31" // server version
    "00 05 00 00 00 31 30 2e 31 31" // pg_dump version
    "00 0f 00 00 00" // toc size
);

const NULL_DATABASE_DUMP: [u8; 81] = hex!(
    "50 47 44 4d 50" // PGDMP
    "01 0d 00" // major, minor, patch version
    "04" // integer size
    "08" // offset size
    "01" // format
    "01 01 00 00 00" // Compression level
    "00 21 00 00 00" // Seconds
    "00 35 00 00 00" // Minutes
    "00 12 00 00 00" // Hours
    "00 03 00 00 00" // Days
    "00 06 00 00 00" // Months
    "00 79 00 00 00" // Years (since 1900)
    "00 01 00 00 00" // is DST
    "01 01 00 00 00" // database name (NULL)
    "00 05 00 00 00 31 30 2e 31 31" // server version
    "00 05 00 00 00 31 30 2e 31 31" // pg_dump version
    "00 0f 00 00 00" // toc size
);

const V15_DUMP: [u8; 95] = hex!(
    "50 47 44 4d 50" // PGDMP
    "01 0f 02" // major, minor, patch version
    "04" // integer size
    "08" // offset size
    "01" // format
    "00 06 00 00 00 67 7a 69 70 3a 36" // Compression spec
    "00 21 00 00 00" // Seconds
    "00 35 00 00 00" // Minutes
    "00 12 00 00 00" // Hours
    "00 03 00 00 00" // Days
    "00 06 00 00 00" // Months
    "00 79 00 00 00" // Years (since 1900)
    "00 01 00 00 00" // is DST
    "00 08 00 00 00 65 6d 70 74 79 5f 64 62" // database name
    "00 05 00 00 00 31 35 2e 31 30" // server version
    "00 05 00 00 00 31 35 2e 31 30" // pg_dump version
    "00 0f 00 00 00" // toc size
);

const V16_DUMP: [u8; 49] = hex!(
    "50 47 44 4d 50" // PGDMP
    "01 10 00" // major, minor, patch version
    "02" // integer size
    "08" // offset size
    "05" // format
    "03" // Compression algorithm
    "00 14 00" // Seconds
    "00 35 00" // Minutes
    "00 07 00" // Hours
    "00 18 00" // Days
    "00 09 00" // Months
    "00 7c 00" // Years (since 1900)
    "00 00 00" // is DST
    "00 00 00" // database name (empty)
    "00 04 00 31 36 2e 32" // server version
    "01 01 00" // pg_dump version (NULL)
    "00 2a 01" // toc size
);

#[test]
fn test_parse_min_dump() -> Result<(), HeaderError> {
    let header = Header::parse(&mut &MIN_DUMP[..])?;
    assert_eq!(header.version, (1, 13, 0));
    assert_eq!(header.int_size, 4);
    assert_eq!(header.offset_size, 8);
    assert_eq!(header.format, ArchiveFormat::Custom);
    assert_eq!(header.compression, Compression::Level(-1));
    assert_eq!(header.create_date.sec, 33);
    assert_eq!(header.create_date.min, 53);
    assert_eq!(header.create_date.hour, 18);
    assert_eq!(header.create_date.day, 3);
    assert_eq!(header.create_date.month, 6);
    assert_eq!(header.create_date.year, 2021);
    assert_eq!(header.create_date.is_dst, 1);
    assert_eq!(header.database_name.as_deref(), Some("empty_db"));
    assert_eq!(header.server_version.as_deref(), Some("10.11"));
    assert_eq!(header.pgdump_version.as_deref(), Some("10.11"));
    assert_eq!(header.toc_count, 15);
    Ok(())
}

#[test]
fn test_null_database_name() -> Result<(), HeaderError> {
    let header = Header::parse(&mut &NULL_DATABASE_DUMP[..])?;
    assert_eq!(header.database_name, None);
    assert_eq!(header.server_version.as_deref(), Some("10.11"));
    assert_eq!(header.toc_count, 15);
    Ok(())
}

#[test]
fn test_parse_v16_dump() -> Result<(), HeaderError> {
    let header = Header::parse(&mut &V16_DUMP[..])?;
    assert_eq!(header.version, (1, 16, 0));
    assert_eq!(header.format, ArchiveFormat::Directory);
    assert_eq!(header.compression, Compression::Algorithm(3));
    assert_eq!(header.create_date.year, 2024);
    assert_eq!(header.database_name, Some(String::new()));
    assert_eq!(header.server_version.as_deref(), Some("16.2"));
    assert_eq!(header.pgdump_version, None);
    assert_eq!(header.toc_count, 298);
    Ok(())
}

#[test]
fn test_parse_v15_dump() -> Result<(), HeaderError> {
    let header = Header::parse(&mut &V15_DUMP[..])?;
    assert_eq!(header.version, (1, 15, 2));
    assert_eq!(
        header.compression,
        Compression::Spec(Some(String::from("gzip:6")))
    );
    assert_eq!(header.server_version.as_deref(), Some("15.10"));
    assert_eq!(header.toc_count, 15);
    Ok(())
}

#[test]
fn test_truncated_input() {
    for dump in [
        &MIN_DUMP[..],
        &NULL_DATABASE_DUMP[..],
        &V15_DUMP[..],
        &V16_DUMP[..],
    ] {
        for len in 0..dump.len() {
            let result = Header::parse(&mut &dump[..len]);
            assert!(
                matches!(result, Err(HeaderError::NeedMoreData)),
                "prefix of {} bytes gave {:?}",
                len,
                result
            );
        }
    }
}

#[test]
fn test_not_an_archive() {
    let data = b"CAFE\n\x01\x0d\x00";
    let mut input = &data[..];
    match Header::parse(&mut input) {
        Err(HeaderError::NotAnArchive(magic)) => assert_eq!(magic, b"CAFE\n"),
        r => panic!("expected NotAnArchive, got {:?}", r),
    }
    assert_eq!(input, b"\x01\x0d\x00");
}

#[test]
fn test_integer_overflow() {
    let mut data = Vec::from(&hex!(
        "50 47 44 4d 50" // PGDMP
        "01 0d 00" // major, minor, patch version
        "08" // integer size
        "08" // offset size
        "01" // format
    )[..]);

    let mut positive = data.clone();
    positive.extend(hex!("00 00 00 00 00 00 00 00 80"));
    assert!(matches!(
        Header::parse(&mut &positive[..]),
        Err(HeaderError::IntegerOverflow { negative: false, .. })
    ));

    data.extend(hex!("01 01 00 00 00 00 00 00 80"));
    assert!(matches!(
        Header::parse(&mut &data[..]),
        Err(HeaderError::IntegerOverflow { negative: true, .. })
    ));
}

#[test]
fn test_json_round_trip() -> Result<(), HeaderError> {
    for dump in [
        &MIN_DUMP[..],
        &NULL_DATABASE_DUMP[..],
        &V15_DUMP[..],
        &V16_DUMP[..],
    ] {
        let header = Header::parse(&mut &dump[..])?;
        let json: Value = serde_json::from_slice(&pgdump_header::extract(&mut &dump[..])?)?;
        let object = json.as_object().expect("JSON object");

        // NULL strings are written as an explicit null, not left out
        assert_eq!(object.len(), 19);
        for key in ["database", "remoteVersion", "pgDumpVersion"] {
            assert!(object.contains_key(key), "missing key {}", key);
        }

        let string = |key: &str| json[key].as_str().map(String::from);
        let int = |key: &str| json[key].as_i64();

        assert_eq!(json["magic"], "PGDMP");
        assert_eq!(json["format"], header.format.to_string().as_str());
        assert_eq!(int("vmain"), Some(header.version.0 as i64));
        assert_eq!(int("vmin"), Some(header.version.1 as i64));
        assert_eq!(int("vrev"), Some(header.version.2 as i64));
        assert_eq!(int("intsize"), Some(header.int_size as i64));
        assert_eq!(int("offsize"), Some(header.offset_size as i64));
        assert_eq!(int("timeSec"), Some(header.create_date.sec));
        assert_eq!(int("timeMin"), Some(header.create_date.min));
        assert_eq!(int("timeHour"), Some(header.create_date.hour));
        assert_eq!(int("timeDay"), Some(header.create_date.day));
        assert_eq!(int("timeMonth"), Some(header.create_date.month));
        assert_eq!(int("timeYear"), Some(header.create_date.year));
        assert_eq!(int("timeIsDst"), Some(header.create_date.is_dst));
        assert_eq!(string("database"), header.database_name);
        assert_eq!(string("remoteVersion"), header.server_version);
        assert_eq!(string("pgDumpVersion"), header.pgdump_version);
        assert_eq!(int("toccount"), Some(header.toc_count));
        match &header.compression {
            Compression::Level(level) => assert_eq!(int("compression"), Some(*level)),
            Compression::Spec(spec) => assert_eq!(&string("compressionSpec"), spec),
            Compression::Algorithm(a) => {
                assert_eq!(int("compressionAlgorithm"), Some(*a as i64))
            }
        }
    }
    Ok(())
}
