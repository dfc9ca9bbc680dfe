#[macro_export]
macro_rules! assert_eq_unordered {
    ($actual:expr, $expect:expr) => {
        let mut vals = std::collections::HashSet::new();

        for val in $actual {
            assert!(vals.insert(val));
        }

        for val in $expect {
            assert!(vals.remove(val), "`{:#?}` missing", val);
        }

        assert!(vals.is_empty());
    };
}

/// Runs each listed `async fn(DbTest)` once per enabled backend.
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+
    ) => {
        #[cfg(feature = "memory")]
        mod memory {
            $(
                #[tokio::test]
                $( #[$attrs] )*
                async fn $f() {
                    let test = $crate::DbTest::new($crate::db::memory::SetupMemory).await;
                    super::$f(test).await;
                }
            )*
        }

        #[cfg(feature = "sqlite")]
        mod sqlite {
            $(
                #[tokio::test]
                $( #[$attrs] )*
                async fn $f() {
                    let test = $crate::DbTest::new($crate::db::sqlite::SetupSqlite).await;
                    super::$f(test).await;
                }
            )*
        }
    };
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident,
        )+
    ) => {
        $crate::tests!( $(
            $( #[$attrs] )*
            $f
        ),+ );
    }
}
