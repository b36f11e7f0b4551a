//! Indicate-then-screen over a collected table

use approx::assert_relative_eq;
use polars::prelude::*;
use sdam_indicators::columns::{
    CURRENT_ASSET, CURRENT_LIAB, ISSUED_STOCK, KRX_CODE, NCAV, NCAV_SHARE, NON_CURRENT_LIAB,
    STOCK_PRICE,
};
use sdam_indicators::{Indicator, NcavIndicator, ScreenConfig, screen_ncav};

fn collected_table() -> DataFrame {
    df!(
        "CORP_NAME" => ["고려아연", "삼성전자", "다코", "미상장"],
        KRX_CODE => ["010130", "005930", "091440", "999999"],
        CURRENT_ASSET => [6_000_000_000i64, 177_388_524_000_000, 90_000_000_000, 0],
        CURRENT_LIAB => [2_000_000_000i64, 63_783_351_000_000, 10_000_000_000, 0],
        NON_CURRENT_LIAB => [1_000_000_000i64, 24_981_592_000_000, 5_000_000_000, 0],
        ISSUED_STOCK => [18_870_000i64, 5_969_782_550, 10_000_000, 0],
        STOCK_PRICE => [528_000i64, 72_300, 3_000, 0]
    )
    .unwrap()
}

#[test]
fn test_indicate_then_screen() {
    let indicated = NcavIndicator.apply(collected_table()).unwrap();

    let ncav = indicated.column(NCAV).unwrap().i64().unwrap();
    assert_eq!(ncav.get(2), Some(75_000_000_000));
    assert_eq!(ncav.get(3), Some(0));

    let ratio = indicated.column(NCAV_SHARE).unwrap().f64().unwrap();
    assert_relative_eq!(ratio.get(2).unwrap(), 2.5, epsilon = 1e-12);
    assert_relative_eq!(ratio.get(3).unwrap(), 0.0);

    let screened = screen_ncav(&indicated, ScreenConfig::default()).unwrap();
    let codes: Vec<&str> = screened
        .column(KRX_CODE)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(codes, vec!["091440"]);
}

#[test]
fn test_null_amounts_count_as_zero() {
    let table = df!(
        KRX_CODE => ["000001"],
        CURRENT_ASSET => [Some(1_000i64)],
        CURRENT_LIAB => [None::<i64>],
        NON_CURRENT_LIAB => [Some(100i64)],
        ISSUED_STOCK => [Some(10i64)],
        STOCK_PRICE => [Some(9i64)]
    )
    .unwrap();

    let indicated = NcavIndicator.apply(table).unwrap();
    assert_eq!(indicated.column(NCAV).unwrap().i64().unwrap().get(0), Some(900));
    assert_relative_eq!(
        indicated.column(NCAV_SHARE).unwrap().f64().unwrap().get(0).unwrap(),
        10.0
    );
}
