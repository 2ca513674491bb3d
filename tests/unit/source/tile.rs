use super::*;

#[test]
fn tile_url_matches_provider_layout() {
    let spec = GridSpec::new(4, 550, 180).unwrap();
    let ts = Timestamp::parse("2026-01-11 16:10:00").unwrap();
    assert_eq!(
        tile_url(
            "https://anzu.shinshu-u.ac.jp/himawari/img/D531106",
            spec,
            ts,
            GridCoord::new(2, 3)
        ),
        "https://anzu.shinshu-u.ac.jp/himawari/img/D531106/4d/550/2026/01/11/161000_2_3.png"
    );
}

#[test]
fn tile_url_ignores_trailing_slash_and_pads_fields() {
    let spec = GridSpec::new(2, 550, 0).unwrap();
    let ts = Timestamp::from_ymd_hms(2026, 3, 4, 5, 6, 7).unwrap();
    assert_eq!(
        tile_url("http://tiles.local/", spec, ts, GridCoord::new(0, 1)),
        "http://tiles.local/2d/550/2026/03/04/050607_0_1.png"
    );
}
