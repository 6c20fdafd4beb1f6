//! BACnet driver engine
//!
//! Reads and writes points on one BACnet device through an external transport
//! proxy, batching reads to fit the device's APDU limit.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `bacnet-core`: Core types, error handling, value codecs and device settings
//! - `bacnet-interface`: Register models, registry loading, point maps and scaling
//! - `bacnet-application`: Read batching, write preparation and result decoding
//! - `bacnet-transport`: Transport proxy contract, client policy and TCP connector
//! - `bacnet-driver`: Driver facade with snapshot-based reconfiguration
//!
//! # Implementation Status
//!
//! ## ✅ 已完成
//! - 核心数据类型（ObjectIdentifier, PropertyIdentifier, PropertyValue, DataType）
//! - 寄存器表加载（CSV / JSON）与点表校验
//! - 读批量规划（APDU 预算、分段回退）
//! - 写入准备（类型校验、线性缩放反算、优先级）
//! - 代理客户端（超时、忙重试）与 TCP 代理连接
//! - 驱动外观（配置、扫描、单点读写、撤销）
//!
//! 设备发现、COV 订阅、趋势与报警服务不在本库范围内。
//!
//! # Usage
//!
//! ```no_run
//! use bacnet::driver::BacnetDriver;
//! use bacnet::transport::TcpProxy;
//! use std::sync::Arc;
//!
//! let driver = BacnetDriver::new(Arc::new(TcpProxy::new("127.0.0.1:9001")));
//! ```

// Re-export core types
pub use bacnet_core::{
    BacnetError, BacnetResult, DataType, DeviceConfig, ObjectIdentifier, ObjectType, PointValue,
    PropertyIdentifier, PropertyValue, Segmentation,
};

// Re-export driver API
pub mod driver {
    pub use bacnet_driver::*;
}

// Re-export register handling
pub mod interface {
    pub use bacnet_interface::*;
}

// Re-export request planning
pub mod application {
    pub use bacnet_application::*;
}

// Re-export transport
pub mod transport {
    pub use bacnet_transport::*;
}
