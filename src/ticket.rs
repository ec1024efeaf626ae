//! Digital ticket rendering: the booking summary is serialized to JSON and
//! encoded as an SVG QR image for visual confirmation at boarding. Nothing
//! verifies the code; it carries no security meaning.

use crate::models::TicketSummary;
use qrcode::render::svg;
use qrcode::QrCode;

pub fn ticket_qr_svg(summary: &TicketSummary) -> Result<String, Box<dyn std::error::Error>> {
    let payload = serde_json::to_string(summary)?;
    let code = QrCode::new(payload.as_bytes())?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(240, 240)
        .build();
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;

    fn summary() -> TicketSummary {
        TicketSummary {
            booking_id: "65a1b2c3d4e5f6a7b8c9d0e1".to_string(),
            trip_title: "Umrah Essentials".to_string(),
            start_date: "2026-10-01".to_string(),
            passenger_count: 3,
            total_amount: 4350.0,
            status: BookingStatus::Confirmed,
        }
    }

    #[test]
    fn qr_payload_round_trips_the_summary() {
        let payload = serde_json::to_string(&summary()).unwrap();
        let back: TicketSummary = serde_json::from_str(&payload).unwrap();
        assert_eq!(back.booking_id, "65a1b2c3d4e5f6a7b8c9d0e1");
        assert_eq!(back.passenger_count, 3);
        assert_eq!(back.total_amount, 4350.0);
    }

    #[test]
    fn renders_an_svg_image() {
        let image = ticket_qr_svg(&summary()).unwrap();
        assert!(image.starts_with("<?xml") || image.starts_with("<svg"));
        assert!(image.contains("svg"));
    }
}
