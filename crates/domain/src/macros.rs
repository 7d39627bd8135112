/// バリデーション付き識別子 Newtype を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`String` をラップ）
/// - `derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `new()`: 空チェック + 最大長チェック
/// - `as_str()`: 文字列参照
/// - `TryFrom<String>`: `new()` と同じ検証（デシリアライズもこれを経由する）
///
/// 識別子は DB 上の値と完全一致で照合するため、trim は行わない。
/// 前後に空白を含む値はそのまま保持される。
///
/// # 引数
///
/// - `$label`: エラーメッセージに使うラベル（例: `"ワークフロー ID"`）
/// - `$max_length`: 最大文字数（`chars().count()` でカウント）
///
/// # 使用例
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use flowsweep_domain::workflow::TaskId;
///
/// let task_id = TaskId::new("load_task")?;
/// assert_eq!(task_id.as_str(), "load_task");
/// assert!(TaskId::new("").is_err());
/// # Ok(())
/// # }
/// ```
macro_rules! define_validated_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max_length:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        #[serde(try_from = "String")]
        $vis struct $Name(String);

        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into();

                if value.is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は必須です",
                        $label
                    )));
                }

                if value.chars().count() > $max_length {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は {} 文字以内である必要があります",
                        $label, $max_length
                    )));
                }

                Ok(Self(value))
            }

            /// 文字列参照を取得する
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $Name {
            type Error = $crate::DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}
