//! 核心宏定义
//!
//! 提供统一的宏来减少配置类型的样板代码

/// 为配置结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use ui_particles::impl_default;
///
/// struct BurstSettings {
///     amount: u32,
///     label: String,
/// }
///
/// impl_default!(BurstSettings {
///     amount: 50,
///     label: String::from("click"),
/// });
///
/// assert_eq!(BurstSettings::default().amount, 50);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
