//! Built-in sample snapshot
//!
//! Fixed, versioned dataset covering every section the renderer consumes.
//! Doubles as the fallback for failed acquisitions and as the offline test
//! fixture, so its figures are load-bearing for the end-to-end tests.

use serde_json::Value;

/// Bumped whenever the sample structure changes shape
pub const SAMPLE_VERSION: &str = "1";

const SAMPLE_DOCUMENT: &str = r#"{
  "metadata": {
    "report_type": "weekly",
    "sample_version": "1"
  },
  "tckt": {
    "overview": {
      "receivables": {
        "total": 112282563,
        "within_term": 107816808,
        "overdue": 3465756
      },
      "payables": {
        "total": 157050197,
        "within_term": 73185728,
        "overdue": 83864469
      },
      "cash_flow": {
        "current_month": 173612532,
        "previous_month": 135636758
      }
    },
    "explanations": {
      "payment_changes": [
        "Phát sinh TĂNG so với T05: Khoản thanh toán 2 bên Biển Đông và MTT (hơn 30 tỷ VNĐ)",
        "Phát sinh TĂNG so với T05: Sửa chữa vệ sinh lưu cont khối EQC (gần 5 tỷ VNĐ)",
        "Phát sinh GIẢM so với T05: Khoản dầu trong nước giảm so với T05 hơn 11 tỷ VNĐ"
      ],
      "revenue_changes": [
        "Tổng quan chung GIẢM so với T.05",
        "Cước đại lý quốc tế giảm 22 tỷ VNĐ",
        "Cước nội địa giảm 6,5 tỷ VNĐ"
      ]
    }
  },
  "ops": {
    "ship_schedule": [
      {
        "ship_name": "MTT LimBang",
        "voyage": "25LG021 S/N",
        "route": "PCX",
        "position": "Etd CCU 14/8",
        "speed_sb_nb": "11.6",
        "weather": "3E",
        "days_notes": "",
        "status": "Dự kiến neo chờ boretide 5 ngày",
        "actual_ports": ""
      },
      {
        "ship_name": "BD Mariner",
        "voyage": "MB2525 S/N",
        "route": "CMS",
        "position": "Đang voy 26N",
        "speed_sb_nb": "11.1",
        "weather": "11.4",
        "days_notes": "9 ngày 18h",
        "status": "Adhoc Đà Nẵng",
        "actual_ports": "Tcit và GML kẹt (cập TT, cmit)"
      },
      {
        "ship_name": "BD Star",
        "voyage": "BS2527 S/N",
        "route": "NSS",
        "position": "đang voy 28S",
        "speed_sb_nb": "11.2",
        "weather": "12.1",
        "days_notes": "7 ngày 9.5h",
        "status": "",
        "actual_ports": "VDV"
      }
    ],
    "performance": {
      "profomar_vs_actual": {
        "ships": ["MB2525SN", "BS2527SN", "NB2523SN"],
        "profomar_days": [8, 7, 7],
        "actual_days": [9.7, 7.4, 7]
      }
    }
  },
  "kinh_doanh": {
    "market_overview": {
      "hph_hcm_route": { "vlines_share": 11.0, "others_share": 89.0 },
      "hcm_hph_route": { "vlines_share": 11.6, "others_share": 88.4 }
    },
    "domestic_performance": {
      "weeks": ["VN125/25", "BL125/25", "BS125/25", "VJ125/25",
                "VN225/25", "BL225/25", "BS225/25", "VJ225/25",
                "VN325/25", "BL325/25", "BS325/25", "VJ325/25"],
      "allocated": [460, 620, 460, 620, 460, 620, 460, 620, 460, 620, 460, 620],
      "actual": [520, 662, 462, 560, 460, 620, 460, 620, 420, 600, 720, 680],
      "percentage": [113, 107, 100, 90, 100, 100, 100, 110, 92, 105, 116, 110]
    },
    "top_customers": {
      "hph_hcm": ["Honda", "Minh Đức", "Acecook", "Leeman", "Calofic"],
      "hcm_hph": ["Acecook", "Dương", "Pantos", "Chánh", "Việt Nhật", "Panasonic"],
      "hcm_dan": ["Calofic", "Chánh", "Pantos", "Acecook", "Dương"]
    },
    "market_notes": [
      "GMD tàu Pacific Express dự kiến lên đà tại Phà Rừng từ đầu tháng 8/25",
      "Dự kiến tình hình thị trường đầu hph trong nửa đầu tháng 8 vẫn tốt"
    ]
  },
  "eqc": {
    "overview": { "revenue": 25000000, "cost": 18000000, "profit_margin": 28.0 }
  },
  "thuong_vu": {
    "production_volume": { "total_teus": 12500, "revenue": 450000000 }
  },
  "tong_quan_tau": {
    "fuel_consumption": {
      "fo_actual": [8.98, 10.63, 9.7],
      "fo_standard": [8.5, 8.5, 7.5],
      "do_actual": [8.98, 10.63, 9.7],
      "do_standard": [8.5, 8.5, 7.5]
    }
  }
}"#;

/// The sample data tree. `metadata.week` and `metadata.generated_at` are
/// stamped by [`Snapshot::new`](crate::snapshot::Snapshot::new) at resolve
/// time, not baked into the document.
pub fn data() -> Value {
    serde_json::from_str(SAMPLE_DOCUMENT).expect("built-in sample should be valid JSON")
}
